//! Form payloads for profile and slot endpoints

use serde::Deserialize;

use crate::services::upsert::{FieldUpdate, WritePolicy};
use crate::store::CellValue;
use crate::store::schema::{profile_cols, slot_cols};

/// Maximum number of skills a profile carries
pub const MAX_SKILLS: usize = 8;

/// Separator used when storing the skills list in a single cell
pub const SKILL_SEPARATOR: &str = ", ";

/// Profile form as submitted by the create/update pages.
/// Absent fields deserialize as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    #[serde(alias = "employee_id")]
    pub email: String,
    pub grade: String,
    pub evaluation_round: String,
    pub name: String,
    pub contact: String,
    pub tsr: String,
    pub account: String,
    pub competency: String,
    pub geo: String,
    pub skill_1: String,
    pub skill_2: String,
    pub skill_3: String,
    pub skill_4: String,
    pub skill_5: String,
    pub skill_6: String,
    pub skill_7: String,
    pub skill_8: String,
}

impl ProfileForm {
    /// Non-blank skills in form order
    pub fn skills(&self) -> Vec<&str> {
        let slots: [&str; MAX_SKILLS] = [
            &self.skill_1,
            &self.skill_2,
            &self.skill_3,
            &self.skill_4,
            &self.skill_5,
            &self.skill_6,
            &self.skill_7,
            &self.skill_8,
        ];
        slots
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn skills_text(&self) -> String {
        self.skills().join(SKILL_SEPARATOR)
    }

    /// Column updates for this form. Scalar fields skip blanks; the skills
    /// list always replaces the stored list.
    pub fn field_updates(&self) -> Vec<FieldUpdate> {
        vec![
            FieldUpdate::skip_blank(profile_cols::GRADE, self.grade.trim()),
            FieldUpdate::skip_blank(profile_cols::EVALUATION_ROUND, self.evaluation_round.trim()),
            FieldUpdate::skip_blank(profile_cols::NAME, self.name.trim()),
            FieldUpdate::skip_blank(profile_cols::CONTACT, self.contact.trim()),
            FieldUpdate::skip_blank(profile_cols::TSR, self.tsr.trim()),
            FieldUpdate::skip_blank(profile_cols::ACCOUNT, self.account.trim()),
            FieldUpdate::skip_blank(profile_cols::COMPETENCY, self.competency.trim()),
            FieldUpdate::skip_blank(profile_cols::GEO, self.geo.trim()),
            FieldUpdate::replace(profile_cols::SKILLS, self.skills_text()),
        ]
    }
}

/// Slot form as submitted by the slot pages
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlotForm {
    #[serde(alias = "employee_id")]
    pub email: String,
    pub name: String,
    pub competency: String,
    pub geo: String,
    pub slot_start_date: String,
    pub slot_end_date: String,
    pub slot_start_time: String,
    pub slot_count: String,
}

impl SlotForm {
    /// Text column updates; the slot count is validated and added by the caller
    pub fn field_updates(&self, policy: WritePolicy) -> Vec<FieldUpdate> {
        [
            (slot_cols::NAME, &self.name),
            (slot_cols::COMPETENCY, &self.competency),
            (slot_cols::GEO, &self.geo),
            (slot_cols::START_DATE, &self.slot_start_date),
            (slot_cols::END_DATE, &self.slot_end_date),
            (slot_cols::START_TIME, &self.slot_start_time),
        ]
        .into_iter()
        .map(|(column, value)| FieldUpdate {
            column,
            value: CellValue::text(value.trim()),
            policy,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_drop_blanks_and_keep_order() {
        let form = ProfileForm {
            skill_1: "Rust".into(),
            skill_2: " ".into(),
            skill_3: "SQL".into(),
            skill_8: " Kafka ".into(),
            ..Default::default()
        };
        assert_eq!(form.skills(), vec!["Rust", "SQL", "Kafka"]);
        assert_eq!(form.skills_text(), "Rust, SQL, Kafka");
    }

    #[test]
    fn test_profile_updates_policies() {
        let form = ProfileForm::default();
        let updates = form.field_updates();
        let skills = updates
            .iter()
            .find(|u| u.column == profile_cols::SKILLS)
            .unwrap();
        assert_eq!(skills.policy, WritePolicy::Replace);
        assert!(
            updates
                .iter()
                .filter(|u| u.column != profile_cols::SKILLS)
                .all(|u| u.policy == WritePolicy::SkipBlank)
        );
    }

    #[test]
    fn test_slot_updates_trim_values() {
        let form = SlotForm {
            name: "  Ann ".into(),
            ..Default::default()
        };
        let updates = form.field_updates(WritePolicy::Replace);
        assert_eq!(updates.len(), 6);
        assert_eq!(updates[0].value, CellValue::String("Ann".into()));
        assert!(updates[1].value.is_blank());
    }
}
