use uuid::Uuid;

/// Prefixed identifier for messages and tool calls, e.g. `msg_<uuid>`.
pub fn create_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        let id = create_id("call");
        assert!(id.starts_with("call_"));
        assert_eq!(id.len(), "call_".len() + 32);
    }

    #[test]
    fn test_id_uniqueness() {
        assert_ne!(create_id("msg"), create_id("msg"));
    }
}
