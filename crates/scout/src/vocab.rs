//! Static skill tables — plain configuration data, built once at startup.
//!
//! Three tables: implied foundational skills (an advanced framework
//! presupposes its base language/tooling), per-skill ecosystem language
//! filters for search queries, and the flat vocabulary the enrichment engine
//! scans repository text against.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Advanced skill → foundational skills it presupposes. Keyed lower-case.
static IMPLIED_SKILLS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("tensorflow", &["python", "numpy", "pandas"][..]),
        ("pytorch", &["python", "numpy"][..]),
        ("keras", &["python", "tensorflow"][..]),
        ("scikit-learn", &["python", "numpy"][..]),
        ("pandas", &["python"][..]),
        ("django", &["python"][..]),
        ("flask", &["python"][..]),
        ("fastapi", &["python"][..]),
        ("rails", &["ruby"][..]),
        ("react", &["javascript"][..]),
        ("nextjs", &["react", "javascript"][..]),
        ("vue", &["javascript"][..]),
        ("angular", &["typescript"][..]),
        ("express", &["nodejs", "javascript"][..]),
        ("nodejs", &["javascript"][..]),
        ("spring", &["java"][..]),
        ("laravel", &["php"][..]),
        ("actix", &["rust"][..]),
        ("tokio", &["rust"][..]),
        ("kubernetes", &["docker"][..]),
        ("terraform", &["aws"][..]),
    ])
});

/// Skill → source-language ecosystems used as `language:` search filters.
static LANGUAGE_FILTERS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("tensorflow", &["python"][..]),
        ("pytorch", &["python"][..]),
        ("keras", &["python"][..]),
        ("scikit-learn", &["python"][..]),
        ("pandas", &["python"][..]),
        ("django", &["python"][..]),
        ("flask", &["python"][..]),
        ("fastapi", &["python"][..]),
        ("python", &["python"][..]),
        ("rails", &["ruby"][..]),
        ("ruby", &["ruby"][..]),
        ("react", &["javascript", "typescript"][..]),
        ("nextjs", &["javascript", "typescript"][..]),
        ("vue", &["javascript"][..]),
        ("angular", &["typescript"][..]),
        ("nodejs", &["javascript", "typescript"][..]),
        ("express", &["javascript"][..]),
        ("javascript", &["javascript"][..]),
        ("typescript", &["typescript"][..]),
        ("spring", &["java"][..]),
        ("java", &["java"][..]),
        ("kotlin", &["kotlin"][..]),
        ("swift", &["swift"][..]),
        ("laravel", &["php"][..]),
        ("php", &["php"][..]),
        ("actix", &["rust"][..]),
        ("tokio", &["rust"][..]),
        ("rust", &["rust"][..]),
        ("go", &["go"][..]),
        ("golang", &["go"][..]),
    ])
});

/// Tokens the enrichment engine looks for as substrings of repository
/// names, descriptions, and topics. All lower-case.
pub static SKILL_VOCABULARY: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "rust",
    "golang",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "scala",
    "react",
    "vue",
    "angular",
    "nextjs",
    "nodejs",
    "express",
    "django",
    "flask",
    "fastapi",
    "rails",
    "spring",
    "laravel",
    "tensorflow",
    "pytorch",
    "keras",
    "scikit-learn",
    "pandas",
    "numpy",
    "jupyter",
    "machine-learning",
    "deep-learning",
    "nlp",
    "docker",
    "kubernetes",
    "terraform",
    "ansible",
    "aws",
    "gcp",
    "azure",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "elasticsearch",
    "kafka",
    "rabbitmq",
    "graphql",
    "grpc",
    "microservices",
    "devops",
    "ci/cd",
    "linux",
];

/// Foundational skills implied by `skill`, or empty when none are known.
pub fn implied_skills(skill: &str) -> &'static [&'static str] {
    IMPLIED_SKILLS
        .get(skill.to_lowercase().as_str())
        .copied()
        .unwrap_or(&[])
}

/// Ecosystem language filters for `skill`, or empty when none are known.
pub fn language_filters(skill: &str) -> &'static [&'static str] {
    LANGUAGE_FILTERS
        .get(skill.to_lowercase().as_str())
        .copied()
        .unwrap_or(&[])
}
