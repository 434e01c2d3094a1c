//! Built-in example profiles installed into an empty profile store

use profile_merge::ProfileOverlay;
use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `(id, overlay)` pairs installed by `--init` when no profiles exist
pub fn builtin_profiles() -> Vec<(&'static str, ProfileOverlay)> {
    vec![
        (
            "opus",
            ProfileOverlay {
                name: "Claude Opus".to_string(),
                description: "Anthropic Claude Opus via the built-in provider".to_string(),
                primary: "anthropic/claude-opus-4-5".to_string(),
                models: object(json!({
                    "anthropic/claude-opus-4-5": {"alias": "opus"}
                })),
                providers: Map::new(),
            },
        ),
        (
            "sonnet",
            ProfileOverlay {
                name: "Claude Sonnet".to_string(),
                description: "Anthropic Claude Sonnet via the built-in provider".to_string(),
                primary: "anthropic/claude-sonnet-4-5".to_string(),
                models: object(json!({
                    "anthropic/claude-sonnet-4-5": {"alias": "sonnet"}
                })),
                providers: Map::new(),
            },
        ),
        (
            "ollama",
            ProfileOverlay {
                name: "Ollama (local)".to_string(),
                description: "Local Ollama server on the default port".to_string(),
                primary: "ollama/qwen3:32b".to_string(),
                models: object(json!({
                    "ollama/qwen3:32b": {"alias": "qwen"}
                })),
                providers: object(json!({
                    "ollama": {
                        "baseUrl": "http://127.0.0.1:11434/v1",
                        "apiKey": "ollama-local",
                        "api": "openai-completions",
                        "models": [
                            {
                                "id": "qwen3:32b",
                                "name": "Qwen3 32B",
                                "reasoning": false,
                                "input": ["text"],
                                "contextWindow": 32768,
                                "maxTokens": 8192
                            }
                        ]
                    }
                })),
            },
        ),
    ]
}
