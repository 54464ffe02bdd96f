// Custom actions invoked by the dialogue runtime.
// One static table maps action names to handlers; question categories share
// a single handler parameterized by their prompt template.

pub mod handlers;
pub mod messages;
pub mod prompts;

/// Extraction categories answered by the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Skills,
    Summary,
    Experience,
    TechStack,
    Education,
    Contact,
    Projects,
    Certifications,
    SkillsComparison,
    Statistics,
    General,
}

impl Category {
    /// Categories whose prompt embeds the raw user utterance.
    pub fn uses_utterance(self) -> bool {
        matches!(self, Category::SkillsComparison | Category::General)
    }

    /// Text placed in front of the completion reply, if any.
    pub fn reply_prefix(self) -> &'static str {
        match self {
            Category::Statistics => "📊 Resume Statistics:\n",
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UploadResume,
    Ask(Category),
    DebugSlots,
}

const ACTION_PREFIX: &str = "action_";

/// Every routable action name and its handler.
pub const ACTIONS: &[(&str, Action)] = &[
    ("action_upload_resume", Action::UploadResume),
    ("action_ask_skills", Action::Ask(Category::Skills)),
    ("action_ask_summary", Action::Ask(Category::Summary)),
    ("action_ask_experience", Action::Ask(Category::Experience)),
    ("action_ask_techstack", Action::Ask(Category::TechStack)),
    ("action_ask_education", Action::Ask(Category::Education)),
    ("action_ask_contact", Action::Ask(Category::Contact)),
    ("action_ask_projects", Action::Ask(Category::Projects)),
    ("action_ask_certifications", Action::Ask(Category::Certifications)),
    ("action_compare_skills", Action::Ask(Category::SkillsComparison)),
    ("action_get_resume_stats", Action::Ask(Category::Statistics)),
    ("action_ask_general", Action::Ask(Category::General)),
    ("action_debug_slots", Action::DebugSlots),
];

impl Action {
    pub fn from_action_name(name: &str) -> Option<Self> {
        ACTIONS
            .iter()
            .find(|(action_name, _)| *action_name == name)
            .map(|(_, action)| *action)
    }

    /// Intents share the action names minus the `action_` prefix.
    pub fn from_intent(intent: &str) -> Option<Self> {
        ACTIONS
            .iter()
            .find(|(action_name, _)| action_name.strip_prefix(ACTION_PREFIX) == Some(intent))
            .map(|(_, action)| *action)
    }

    pub fn name(self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, action)| *action == self)
            .map(|(name, _)| *name)
            .unwrap_or("action_unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_route_one_to_one() {
        for (name, action) in ACTIONS {
            assert_eq!(Action::from_action_name(name), Some(*action));
            assert_eq!(action.name(), *name);
        }
    }

    #[test]
    fn test_table_has_no_duplicates() {
        for (i, (name, action)) in ACTIONS.iter().enumerate() {
            for (other_name, other_action) in &ACTIONS[i + 1..] {
                assert_ne!(name, other_name);
                assert_ne!(action, other_action);
            }
        }
    }

    #[test]
    fn test_intent_names_drop_prefix() {
        assert_eq!(
            Action::from_intent("ask_skills"),
            Some(Action::Ask(Category::Skills))
        );
        assert_eq!(Action::from_intent("upload_resume"), Some(Action::UploadResume));
        assert_eq!(
            Action::from_intent("get_resume_stats"),
            Some(Action::Ask(Category::Statistics))
        );
        assert_eq!(Action::from_intent("action_ask_skills"), None);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(Action::from_action_name("action_order_pizza"), None);
        assert_eq!(Action::from_action_name(""), None);
        assert_eq!(Action::from_intent("greet"), None);
    }

    #[test]
    fn test_only_comparison_and_general_read_the_utterance() {
        assert!(Category::SkillsComparison.uses_utterance());
        assert!(Category::General.uses_utterance());
        assert!(!Category::Skills.uses_utterance());
        assert!(!Category::Statistics.uses_utterance());
    }
}
