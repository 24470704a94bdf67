//! Aggregation of per-target sharing failures
//!
//! Batch sharing validates every requested target space and reports
//! every problem at once, so a caller can fix all of them in one round
//! trip. Aggregation is a pure function from the failure sets to a
//! structured value; rendering to text is a separate formatting step.

use atrium_core::{AtriumError, SpaceId};
use serde::{Deserialize, Serialize};

/// Category of a sharing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareFailureCategory {
    /// The target space does not resolve or is not readable by the
    /// actor. Absent and unreadable spaces are reported identically so
    /// sharing cannot be used to probe for space existence.
    Unreadable,
    /// The target space is readable but the actor cannot write to it
    Unwriteable,
}

/// Aggregated outcome of validating a batch of share targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareFailure {
    instance_name: String,
    categories: Vec<(ShareFailureCategory, Vec<SpaceId>)>,
}

impl ShareFailure {
    /// The failing categories in report order, each with every
    /// offending space id
    pub fn categories(&self) -> &[(ShareFailureCategory, Vec<SpaceId>)] {
        &self.categories
    }

    /// Render the failure as one sentence per category, joined by a
    /// line break
    pub fn render(&self) -> String {
        self.categories
            .iter()
            .map(|(category, ids)| {
                let list = ids
                    .iter()
                    .map(|id| format!("'{id}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                match category {
                    ShareFailureCategory::Unreadable => format!(
                        "Unable to share service instance {} with spaces [{list}]. \
                         Ensure the spaces exist and that you have access to them.",
                        self.instance_name
                    ),
                    ShareFailureCategory::Unwriteable => format!(
                        "Unable to share service instance {} with spaces [{list}]. \
                         Write permission is required in order to share a service instance \
                         with a space.",
                        self.instance_name
                    ),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<ShareFailure> for AtriumError {
    fn from(failure: ShareFailure) -> Self {
        AtriumError::unprocessable(failure.render())
    }
}

/// Merge the per-target failure sets of one share request into a
/// single structured failure, or `None` when every target passed.
///
/// Spaces that did not resolve join the unreadable category; a space
/// already reported unreadable is never double-reported unwriteable.
pub fn aggregate_share_failures(
    instance_name: &str,
    not_found: Vec<SpaceId>,
    unreadable: Vec<SpaceId>,
    unwriteable: Vec<SpaceId>,
) -> Option<ShareFailure> {
    let mut unreadable_all = not_found;
    unreadable_all.extend(unreadable);

    let mut categories = Vec::new();
    if !unreadable_all.is_empty() {
        categories.push((ShareFailureCategory::Unreadable, unreadable_all));
    }
    if !unwriteable.is_empty() {
        categories.push((ShareFailureCategory::Unwriteable, unwriteable));
    }

    if categories.is_empty() {
        None
    } else {
        Some(ShareFailure {
            instance_name: instance_name.to_string(),
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn all_targets_valid_aggregates_to_none() {
        assert_eq!(
            aggregate_share_failures("db", vec![], vec![], vec![]),
            None
        );
    }

    #[test]
    fn not_found_joins_unreadable_category() {
        let missing = SpaceId::new();
        let unreadable = SpaceId::new();
        let failure =
            aggregate_share_failures("db", vec![missing], vec![unreadable], vec![]).unwrap();

        assert_eq!(failure.categories().len(), 1);
        let (category, ids) = &failure.categories()[0];
        assert_eq!(*category, ShareFailureCategory::Unreadable);
        assert_eq!(ids, &vec![missing, unreadable]);
    }

    #[test]
    fn render_emits_one_line_per_category() {
        let unreadable = SpaceId::new();
        let unwriteable = SpaceId::new();
        let failure =
            aggregate_share_failures("db", vec![], vec![unreadable], vec![unwriteable]).unwrap();

        let rendered = failure.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(&format!("'{unreadable}'")));
        assert!(lines[0].contains("Ensure the spaces exist"));
        assert!(lines[1].contains(&format!("'{unwriteable}'")));
        assert!(lines[1].contains("Write permission is required"));
    }

    #[test]
    fn render_omits_empty_categories() {
        let unwriteable = SpaceId::new();
        let failure = aggregate_share_failures("db", vec![], vec![], vec![unwriteable]).unwrap();

        let rendered = failure.render();
        assert_eq!(rendered.lines().count(), 1);
        assert!(rendered.contains("Write permission is required"));
    }

    #[test]
    fn converts_to_unprocessable() {
        let failure =
            aggregate_share_failures("db", vec![SpaceId::new()], vec![], vec![]).unwrap();
        assert_matches!(AtriumError::from(failure), AtriumError::Unprocessable { .. });
    }
}
