use session_core::{ChatMessage, Role};

/// Display label for a message author.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "analyst",
        Role::User => "you",
        Role::Assistant => "assistant",
    }
}

/// One message as a `label> content` line.
pub fn render_message(message: &ChatMessage) -> String {
    format!("{}> {}", role_label(message.role), message.content)
}

/// Whole conversation, one message per paragraph, insertion order.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_preserves_order_and_roles() {
        let messages = vec![
            ChatMessage::system("Momentum looks constructive."),
            ChatMessage::user("why?"),
            ChatMessage::assistant("The short average crossed above the long."),
        ];

        let transcript = render_transcript(&messages);
        let lines: Vec<&str> = transcript.split("\n\n").collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "analyst> Momentum looks constructive.");
        assert_eq!(lines[1], "you> why?");
        assert!(lines[2].starts_with("assistant> "));
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(render_transcript(&[]), "");
    }
}
