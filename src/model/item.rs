//! Data models for approval work items

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One pending approval request, as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalItem {
    pub work_item_id: String,
    #[serde(default)]
    pub sobject_type: String,
    #[serde(default)]
    pub related_to_name: String,
    #[serde(default)]
    pub related_to_href: String,
    #[serde(default)]
    pub most_recent_approver_name: String,
    #[serde(default)]
    pub most_recent_approver_href: String,
    #[serde(default)]
    pub submitted_by_name: String,
    #[serde(default)]
    pub submitted_by_href: String,
    #[serde(default)]
    pub assigned_name: String,
    #[serde(default)]
    pub assigned_href: String,
    #[serde(default, with = "submitted_date")]
    pub date_submitted: Option<NaiveDate>,
    #[serde(default)]
    pub is_delegated: bool,
}

/// Every addressable field of an [`ApprovalItem`], by its wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    WorkItemId,
    SobjectType,
    RelatedToName,
    RelatedToHref,
    MostRecentApproverName,
    MostRecentApproverHref,
    SubmittedByName,
    SubmittedByHref,
    AssignedName,
    AssignedHref,
    DateSubmitted,
    IsDelegated,
}

impl ItemField {
    pub fn all() -> [ItemField; 12] {
        [
            ItemField::WorkItemId,
            ItemField::SobjectType,
            ItemField::RelatedToName,
            ItemField::RelatedToHref,
            ItemField::MostRecentApproverName,
            ItemField::MostRecentApproverHref,
            ItemField::SubmittedByName,
            ItemField::SubmittedByHref,
            ItemField::AssignedName,
            ItemField::AssignedHref,
            ItemField::DateSubmitted,
            ItemField::IsDelegated,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemField::WorkItemId => "workItemId",
            ItemField::SobjectType => "sobjectType",
            ItemField::RelatedToName => "relatedToName",
            ItemField::RelatedToHref => "relatedToHref",
            ItemField::MostRecentApproverName => "mostRecentApproverName",
            ItemField::MostRecentApproverHref => "mostRecentApproverHref",
            ItemField::SubmittedByName => "submittedByName",
            ItemField::SubmittedByHref => "submittedByHref",
            ItemField::AssignedName => "assignedName",
            ItemField::AssignedHref => "assignedHref",
            ItemField::DateSubmitted => "dateSubmitted",
            ItemField::IsDelegated => "isDelegated",
        }
    }

    pub fn from_name(name: &str) -> Option<ItemField> {
        Self::all().into_iter().find(|f| f.name() == name)
    }

    /// The field actually compared when sorting by this one.
    ///
    /// Link columns carry an href but are ordered by their display name.
    pub fn sort_field(&self) -> ItemField {
        match self {
            ItemField::RelatedToHref => ItemField::RelatedToName,
            ItemField::MostRecentApproverHref => ItemField::MostRecentApproverName,
            ItemField::SubmittedByHref => ItemField::SubmittedByName,
            ItemField::AssignedHref => ItemField::AssignedName,
            other => *other,
        }
    }
}

/// Comparable value extracted from an item
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Text(Cow<'a, str>),
    Flag(bool),
}

impl ApprovalItem {
    /// Text of a field as shown to the user; missing values render empty
    pub fn text(&self, field: ItemField) -> Cow<'_, str> {
        match field {
            ItemField::WorkItemId => Cow::Borrowed(&self.work_item_id),
            ItemField::SobjectType => Cow::Borrowed(&self.sobject_type),
            ItemField::RelatedToName => Cow::Borrowed(&self.related_to_name),
            ItemField::RelatedToHref => Cow::Borrowed(&self.related_to_href),
            ItemField::MostRecentApproverName => Cow::Borrowed(&self.most_recent_approver_name),
            ItemField::MostRecentApproverHref => Cow::Borrowed(&self.most_recent_approver_href),
            ItemField::SubmittedByName => Cow::Borrowed(&self.submitted_by_name),
            ItemField::SubmittedByHref => Cow::Borrowed(&self.submitted_by_href),
            ItemField::AssignedName => Cow::Borrowed(&self.assigned_name),
            ItemField::AssignedHref => Cow::Borrowed(&self.assigned_href),
            ItemField::DateSubmitted => Cow::Owned(self.formatted_date()),
            ItemField::IsDelegated => Cow::Borrowed(if self.is_delegated { "true" } else { "false" }),
        }
    }

    pub fn sort_key(&self, field: ItemField) -> SortKey<'_> {
        match field {
            ItemField::IsDelegated => SortKey::Flag(self.is_delegated),
            other => SortKey::Text(self.text(other)),
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date_submitted
            .map(|d| d.format(submitted_date::FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// `dateSubmitted` accepts a plain date or a timestamp and keeps the date part
mod submitted_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        match NaiveDate::parse_from_str(date_part, FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                // Unparseable dates read as missing
                tracing::debug!(value = %raw, error = %e, "unparseable dateSubmitted");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_record() {
        let json = r#"{
            "workItemId": "04i000000000001",
            "sobjectType": "Account",
            "relatedToName": "Acct A",
            "relatedToHref": "/lightning/r/001/view",
            "mostRecentApproverName": "Dana",
            "dateSubmitted": "2024-01-02",
            "isDelegated": true
        }"#;

        let item: ApprovalItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.work_item_id, "04i000000000001");
        assert_eq!(item.sobject_type, "Account");
        assert_eq!(item.submitted_by_name, "");
        assert_eq!(item.date_submitted, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert!(item.is_delegated);
    }

    #[test]
    fn test_date_submitted_accepts_timestamps_and_nulls() {
        let item: ApprovalItem = serde_json::from_str(
            r#"{"workItemId": "a", "dateSubmitted": "2023-11-30T18:04:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(item.formatted_date(), "2023-11-30");

        let item: ApprovalItem =
            serde_json::from_str(r#"{"workItemId": "b", "dateSubmitted": null}"#).unwrap();
        assert_eq!(item.date_submitted, None);
        assert_eq!(item.formatted_date(), "");
    }

    #[test]
    fn test_unparseable_date_submitted_becomes_none() {
        let items: Vec<ApprovalItem> = serde_json::from_str(
            r#"[
                {"workItemId": "a", "dateSubmitted": "2024-01-02"},
                {"workItemId": "b", "dateSubmitted": "01/02/2024"},
                {"workItemId": "c", "dateSubmitted": "soon"}
            ]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].date_submitted, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(items[1].date_submitted, None);
        assert_eq!(items[2].formatted_date(), "");
    }

    #[test]
    fn test_date_submitted_round_trips_as_plain_date() {
        let item = ApprovalItem {
            work_item_id: "a".to_string(),
            date_submitted: NaiveDate::from_ymd_opt(2024, 3, 9),
            ..Default::default()
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["dateSubmitted"], "2024-03-09");
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in ItemField::all() {
            assert_eq!(ItemField::from_name(field.name()), Some(field));
        }
        assert_eq!(ItemField::from_name("nope"), None);
    }

    #[test]
    fn test_href_fields_sort_on_display_names() {
        assert_eq!(ItemField::RelatedToHref.sort_field(), ItemField::RelatedToName);
        assert_eq!(
            ItemField::MostRecentApproverHref.sort_field(),
            ItemField::MostRecentApproverName
        );
        assert_eq!(ItemField::SubmittedByHref.sort_field(), ItemField::SubmittedByName);
        assert_eq!(ItemField::AssignedHref.sort_field(), ItemField::AssignedName);
        assert_eq!(ItemField::DateSubmitted.sort_field(), ItemField::DateSubmitted);
    }

    #[test]
    fn test_missing_date_sorts_before_present_date() {
        let missing = ApprovalItem::default();
        let present = ApprovalItem {
            date_submitted: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..Default::default()
        };
        assert!(missing.sort_key(ItemField::DateSubmitted) < present.sort_key(ItemField::DateSubmitted));
    }
}
