//! Supported tools and their declarations

use serde_json::json;

use crate::types::Tool;

/// Functions the assistant can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedTool {
    StoreUserData,
    FetchAllUsers,
}

impl SupportedTool {
    pub const ALL: [SupportedTool; 2] = [SupportedTool::StoreUserData, SupportedTool::FetchAllUsers];

    /// Look up a tool by the function name the LLM used
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "store_user_data" => Some(SupportedTool::StoreUserData),
            "fetch_all_users" => Some(SupportedTool::FetchAllUsers),
            _ => None,
        }
    }

    /// Function name, also the endpoint path on the registration service
    pub fn name(self) -> &'static str {
        match self {
            SupportedTool::StoreUserData => "store_user_data",
            SupportedTool::FetchAllUsers => "fetch_all_users",
        }
    }

    /// Human-friendly title, e.g. "Store User Data"
    pub fn title(self) -> String {
        title_case(self.name())
    }

    /// Declaration offered to the LLM
    pub fn declaration(self) -> Tool {
        match self {
            SupportedTool::StoreUserData => Tool::new(
                self.name(),
                "Stores user registration data (name, email, date of birth) in the system. \
                 Use YYYY-MM-DD format for DOB (e.g., 1990-01-01).",
            )
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The full name of the user." },
                    "email": { "type": "string", "description": "The email address of the user." },
                    "dob": { "type": "string", "description": "The date of birth of the user in YYYY-MM-DD format." }
                },
                "required": ["name", "email", "dob"]
            })),
            SupportedTool::FetchAllUsers => Tool::new(
                self.name(),
                "Fetches and returns a list of all registered users with their name, email, and date of birth.",
            )
            .with_schema(json!({
                "type": "object",
                "properties": {}
            })),
        }
    }
}

impl std::fmt::Display for SupportedTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Declarations of every supported tool
pub fn declared_tools() -> Vec<Tool> {
    SupportedTool::ALL.iter().map(|t| t.declaration()).collect()
}

/// `fetch_all_users` -> `Fetch All Users`
pub(crate) fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        for tool in SupportedTool::ALL {
            assert_eq!(SupportedTool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(SupportedTool::from_name("delete_user"), None);
        assert_eq!(SupportedTool::from_name("Store_User_Data"), None);
    }

    #[test]
    fn test_declarations() {
        let tools = declared_tools();
        assert_eq!(tools.len(), 2);

        let store = &tools[0];
        assert_eq!(store.name, "store_user_data");
        let schema = store.input_schema.as_ref().unwrap();
        assert_eq!(schema["required"], json!(["name", "email", "dob"]));

        let fetch = &tools[1];
        assert_eq!(fetch.name, "fetch_all_users");
        assert!(fetch.input_schema.as_ref().unwrap()["properties"]
            .as_object()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_title() {
        assert_eq!(SupportedTool::StoreUserData.title(), "Store User Data");
        assert_eq!(title_case("delete_everything"), "Delete Everything");
    }
}
