use askpane_core::annotate;
use serde_json::Value;
use std::path::Path;

pub fn run(file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => super::read_stdin()?,
    };
    println!("{}", parse_response(&input, json)?);
    Ok(())
}

fn parse_response(input: &str, json: bool) -> anyhow::Result<String> {
    let response: Value = serde_json::from_str(input)?;
    let annotated = annotate(&response);

    if json {
        return Ok(serde_json::to_string_pretty(&annotated)?);
    }

    let mut out = super::render_answer(&annotated);
    if let Some(id) = &annotated.conversation_id {
        out.push_str(&format!("\n\nConversation: {}", id));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "conversation": {
            "sId": "c1",
            "content": [
                [{"content": "q"}],
                [{
                    "content": "Read the Style Guide first.",
                    "actions": [{"output": [
                        {
                            "type": "resource",
                            "resource": {"uri": "https://s/g", "text": "Style Guide"}
                        }
                    ]}]
                }]
            ]
        }
    }"#;

    #[test]
    fn test_parse_text_output() {
        let out = parse_response(RESPONSE, false).unwrap();
        assert!(out.starts_with("Read the [Style Guide](https://s/g) first."));
        assert!(out.contains("• Style Guide - https://s/g"));
        assert!(out.ends_with("Conversation: c1"));
    }

    #[test]
    fn test_parse_json_output() {
        let out = parse_response(RESPONSE, true).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["conversationId"], "c1");
        assert_eq!(value["links"][0]["uri"], "https://s/g");
        assert_eq!(value["answer"], "Read the Style Guide first.");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_response("not json", false).is_err());
    }

    #[test]
    fn test_parse_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("response.json");
        std::fs::write(&path, RESPONSE).unwrap();
        assert!(run(Some(&path), false).is_ok());
        assert!(run(Some(&temp.path().join("missing.json")), false).is_err());
    }
}
