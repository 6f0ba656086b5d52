//! Portfolio content: profile, sections, projects and links.
//!
//! A built-in portfolio is compiled into the binary. A replacement can be
//! loaded from a TOML file, or from JSON when the file extension is `.json`.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

const BUILTIN: &str = include_str!("../portfolio.toml");

/// Errors raised while loading portfolio content.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML content: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid content: {0}")]
    Invalid(String),
}

/// Complete portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    pub sections: Vec<Section>,
}

/// Owner of the portfolio, shown in the hero section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub tagline: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// One page section, reachable from the navigation header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Anchor name.
    pub id: String,
    /// Navigation label.
    pub nav: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SectionBody {
    /// Name, tagline and profile links.
    Hero,
    Text { text: String },
    Projects { projects: Vec<Project> },
    Links { links: Vec<Link> },
}

impl Portfolio {
    /// The portfolio compiled into the binary.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_toml_str(BUILTIN)
    }

    /// Load a portfolio file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ContentError> {
        let portfolio: Self = toml::from_str(text)?;
        portfolio.validate()?;
        Ok(portfolio)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ContentError> {
        let portfolio: Self = serde_json::from_str(text)?;
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// Check that there is at least one section and that anchors are unique.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.sections.is_empty() {
            return Err(ContentError::Invalid("no sections".to_string()));
        }
        let mut seen = HashSet::new();
        for section in &self.sections {
            if section.id.is_empty() || section.nav.is_empty() {
                return Err(ContentError::Invalid(
                    "every section needs an id and a nav label".to_string(),
                ));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(ContentError::Invalid(format!(
                    "duplicate section id {:?}",
                    section.id
                )));
            }
        }
        Ok(())
    }

    /// Index of the section with anchor `id`.
    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_portfolio() {
        let portfolio = Portfolio::builtin().unwrap();
        assert_eq!(portfolio.profile.name, "Tiago Pereira");
        assert_eq!(portfolio.profile.links.len(), 3);

        let navs: Vec<&str> = portfolio.sections.iter().map(|s| s.nav.as_str()).collect();
        assert_eq!(navs, ["Home", "About", "Projects", "Resources", "Hax"]);
        assert_eq!(portfolio.sections[0].body, SectionBody::Hero);

        let SectionBody::Projects { projects } = &portfolio.sections[2].body else {
            panic!("third section should list projects");
        };
        assert_eq!(projects.len(), 7);
        assert_eq!(projects[6].skills, ["Kubernetes", "Container Orchestration"]);
        assert!(!projects[0].description.contains('\n'));

        assert_eq!(portfolio.section_index("hax"), Some(4));
        assert_eq!(portfolio.section_index("skills"), None);
    }

    #[test]
    fn test_json_content() {
        let portfolio = Portfolio::from_json_str(
            r#"{
                "profile": { "name": "Ada", "tagline": "Analyst" },
                "sections": [
                    { "id": "hero", "nav": "Home", "kind": "hero" },
                    { "id": "notes", "nav": "Notes", "title": "Notes", "kind": "text", "text": "Hello" }
                ]
            }"#,
        )
        .unwrap();
        assert!(portfolio.profile.links.is_empty());
        assert_eq!(
            portfolio.sections[1].body,
            SectionBody::Text {
                text: "Hello".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Portfolio::from_toml_str(
            r#"
            [profile]
            name = "Ada"
            tagline = "Analyst"

            [[sections]]
            id = "hero"
            nav = "Home"
            kind = "hero"

            [[sections]]
            id = "hero"
            nav = "Again"
            kind = "hero"
            "#,
        );
        assert!(matches!(result, Err(ContentError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_portfolio() {
        let result = Portfolio::from_toml_str(
            r#"
            sections = []

            [profile]
            name = "Ada"
            tagline = "Analyst"
            "#,
        );
        assert!(matches!(result, Err(ContentError::Invalid(_))));
    }
}
