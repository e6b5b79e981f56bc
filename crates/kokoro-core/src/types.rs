use serde::{Deserialize, Serialize};

/// The single global user profile, as it appears on the wire.
///
/// `age` holds the onboarding placeholder `"select"` until a bracket is
/// chosen; `medical_conditions` holds the literal string `"None"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub nickname: String,
    pub age: String,
    pub occupation: String,
    pub medical_conditions: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            age: "select".to_string(),
            occupation: String::new(),
            medical_conditions: "None".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let p = UserProfile::default();
        assert_eq!(p.nickname, "");
        assert_eq!(p.age, "select");
        assert_eq!(p.occupation, "");
        assert_eq!(p.medical_conditions, "None");
    }

    #[test]
    fn test_partial_profile_fills_defaults() {
        let p: UserProfile = serde_json::from_str(r#"{"nickname": "Yuki"}"#).unwrap();
        assert_eq!(p.nickname, "Yuki");
        assert_eq!(p.age, "select");
        assert_eq!(p.medical_conditions, "None");
    }
}
