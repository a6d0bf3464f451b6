//! Pattern Entity
//!
//! An imported knitting pattern: ordered page images plus project metadata.
//! Counters, photos and notes hang off a pattern and go away with it.

use serde::{Deserialize, Serialize};

use super::entity::{new_id, now_millis, DomainError, DomainResult, Entity};

/// Project name used when the import form leaves it blank
pub const DEFAULT_PROJECT_NAME: &str = "project name";

/// A knitting pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique identifier
    pub id: String,
    pub name: String,
    pub project_name: String,
    /// Free text, possibly two sizes joined by ", "
    pub needle_size: String,
    /// Ordered page image URIs
    pub images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Entity for Pattern {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Input of the "new pattern" flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPattern {
    pub project_name: String,
    pub needle_size: String,
    #[serde(default)]
    pub second_needle_size: String,
    pub images: Vec<String>,
}

impl NewPattern {
    /// Validate the form and build a pattern with fresh id and timestamps
    pub fn into_pattern(self) -> DomainResult<Pattern> {
        if self.images.is_empty() {
            return Err(DomainError::InvalidInput(
                "A pattern needs at least one image".to_string(),
            ));
        }

        let project_name = project_name_or_default(&self.project_name);
        let now = now_millis();
        Ok(Pattern {
            id: new_id(),
            name: project_name.clone(),
            project_name,
            needle_size: combine_needle_sizes(&self.needle_size, &self.second_needle_size),
            images: self.images,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Edits to an existing pattern. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternChanges {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub needle_size: Option<String>,
    #[serde(default)]
    pub second_needle_size: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl PatternChanges {
    /// Apply the same rules as the import form. Leaves `pattern` untouched on error.
    pub fn apply_to(&self, pattern: &mut Pattern) -> DomainResult<()> {
        if matches!(&self.images, Some(images) if images.is_empty()) {
            return Err(DomainError::InvalidInput(
                "A pattern needs at least one image".to_string(),
            ));
        }

        if let Some(name) = &self.project_name {
            pattern.project_name = project_name_or_default(name);
            pattern.name = pattern.project_name.clone();
        }
        if let Some(size) = &self.needle_size {
            pattern.needle_size =
                combine_needle_sizes(size, self.second_needle_size.as_deref().unwrap_or(""));
        }
        if let Some(images) = &self.images {
            pattern.images = images.clone();
        }
        Ok(())
    }
}

pub fn project_name_or_default(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_PROJECT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Join the two needle size fields; the second only counts when filled in.
pub fn combine_needle_sizes(first: &str, second: &str) -> String {
    let first = first.trim();
    let second = second.trim();
    if second.is_empty() {
        first.to_string()
    } else {
        format!("{}, {}", first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_needle_sizes() {
        assert_eq!(combine_needle_sizes("4mm", ""), "4mm");
        assert_eq!(combine_needle_sizes(" 4mm ", " 3.5mm "), "4mm, 3.5mm");
        assert_eq!(combine_needle_sizes("", ""), "");
    }

    #[test]
    fn test_new_pattern_defaults_project_name() {
        let pattern = NewPattern {
            project_name: "   ".to_string(),
            needle_size: "4mm".to_string(),
            second_needle_size: String::new(),
            images: vec!["file:///a.png".to_string()],
        }
        .into_pattern()
        .unwrap();

        assert_eq!(pattern.project_name, DEFAULT_PROJECT_NAME);
        assert_eq!(pattern.name, DEFAULT_PROJECT_NAME);
        assert_eq!(pattern.created_at, pattern.updated_at);
        assert!(!pattern.id.is_empty());
    }

    #[test]
    fn test_changes_follow_form_rules() {
        let mut pattern = NewPattern {
            project_name: "Sweater".to_string(),
            needle_size: "4mm".to_string(),
            second_needle_size: String::new(),
            images: vec!["a.png".to_string()],
        }
        .into_pattern()
        .unwrap();

        PatternChanges {
            project_name: Some("  ".to_string()),
            needle_size: Some("5mm".to_string()),
            second_needle_size: Some("4.5mm".to_string()),
            images: None,
        }
        .apply_to(&mut pattern)
        .unwrap();
        assert_eq!(pattern.project_name, DEFAULT_PROJECT_NAME);
        assert_eq!(pattern.name, DEFAULT_PROJECT_NAME);
        assert_eq!(pattern.needle_size, "5mm, 4.5mm");
        assert_eq!(pattern.images, vec!["a.png"]);

        let before = pattern.clone();
        let err = PatternChanges {
            project_name: Some("Hat".to_string()),
            images: Some(Vec::new()),
            ..Default::default()
        }
        .apply_to(&mut pattern)
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(pattern, before);
    }

    #[test]
    fn test_new_pattern_requires_images() {
        let err = NewPattern {
            project_name: "Sweater".to_string(),
            ..Default::default()
        }
        .into_pattern()
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
