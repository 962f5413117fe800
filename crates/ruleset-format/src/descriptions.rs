//! Human descriptions for well-known categories, used in rendered banners.

/// Description used for categories without a built-in one.
pub const USER_DEFINED: &str = "user-defined category";

const KNOWN: &[(&str, &str)] = &[
    ("OperatingSystem", "operating system clutter (macOS, Windows, Linux)"),
    ("IDE", "files generated by editors and IDEs"),
    ("BuildArtifacts", "build output, binaries, compilation caches"),
    ("Python", "Python environments and bytecode"),
    ("Java", "JVM, Gradle and Maven output"),
    ("NodeJS", "Node and frontend build output"),
    ("Go", "Go modules and binaries"),
    ("Rust", "Rust Cargo"),
    ("DotNet", ".NET / C#"),
    ("Android_iOS", "Android, Xcode and Swift"),
    ("Containers_CI", "Docker, Kubernetes, Terraform and CI/CD artifacts"),
    ("Logs_Tmp", "logs, caches and temporary files"),
    ("LaTeX_Metadata", "LaTeX and Pandoc artifacts"),
    ("Documentation", "generated docs (Sphinx, MkDocs, Hugo)"),
    ("CustomDiagnostics", "custom patterns"),
];

/// The banner description for a category name.
pub fn describe_category(name: &str) -> &'static str {
    KNOWN
        .iter()
        .find(|(known, _)| *known == name)
        .map_or(USER_DEFINED, |(_, description)| description)
}
