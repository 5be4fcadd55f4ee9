use askpane_core::{
    annotate, extract_answer, extract_conversation_id, extract_structured_links,
    inject_links_into_answer, StructuredLink,
};
use serde_json::{json, Value};

fn resource(uri: &str, text: &str) -> Value {
    json!({"type": "resource", "resource": {"uri": uri, "text": text}})
}

fn response_with_actions(answer: &str, actions: Value) -> Value {
    json!({"conversation": {
        "sId": "conv_42",
        "content": [
            [{"content": "user question"}],
            [{"content": answer, "actions": actions}]
        ]
    }})
}

#[test]
fn test_overlapping_uri_across_actions_yields_one_link() {
    let response = response_with_actions(
        "See the Product Page.",
        json!([
            {"output": [resource("https://example.com/product", "Product Page")]},
            {"output": [resource("https://example.com/product", "Product Page (copy)")]}
        ]),
    );

    let links = extract_structured_links(&response);
    let expected = StructuredLink::new("https://example.com/product", "Product Page");
    assert_eq!(links, vec![expected]);
}

#[test]
fn test_extractors_are_independent() {
    let response = response_with_actions(
        "Answer body",
        json!([{"output": [resource("https://a", "A")]}]),
    );

    // Any order, any subset
    let id = extract_conversation_id(&response);
    let links = extract_structured_links(&response);
    let answer = extract_answer(&response);

    assert_eq!(id.as_deref(), Some("conv_42"));
    assert_eq!(links.len(), 1);
    assert_eq!(answer.as_deref(), Some("Answer body"));
}

#[test]
fn test_no_duplicate_uris_for_many_outputs() {
    let outputs: Vec<Value> = (0..20)
        .map(|i| {
            let uri = format!("https://site/{}", i % 3);
            resource(&uri, &format!("Page {}", i))
        })
        .collect();
    let actions = json!([{"output": outputs.clone()}, {"output": outputs}]);
    let response = response_with_actions("x", actions);

    let links = extract_structured_links(&response);
    let mut uris: Vec<&str> = links.iter().map(|l| l.uri.as_str()).collect();
    uris.sort_unstable();
    uris.dedup();
    assert_eq!(uris.len(), links.len());
    assert_eq!(links.len(), 3);
    assert_eq!(links[0].text, "Page 0");
}

#[test]
fn test_deeply_malformed_inputs_degrade() {
    let inputs = [
        json!(null),
        json!({}),
        json!([]),
        json!("string"),
        json!({"conversation": null}),
        json!({"conversation": {"content": [null, null]}}),
        json!({"conversation": {"content": [{}, [null]]}}),
        json!({"conversation": {"content": [{}, [{
            "actions": [null, 3, {"output": {"not": "a list"}}]
        }]]}}),
    ];

    for input in &inputs {
        assert!(extract_structured_links(input).is_empty(), "{}", input);
        assert_eq!(extract_answer(input), None, "{}", input);
    }
}

#[test]
fn test_annotate_injects_links_from_actions() {
    let response = response_with_actions(
        "Use API Protection. The API docs: (https://docs/api) help.\nGlossary:\n",
        json!([
            {"output": [resource("https://docs/api", "API docs")]},
            {"output": [
                resource("https://prot", "API Protection"),
                resource("https://glossary", "Glossary")
            ]}
        ]),
    );

    let annotated = annotate(&response);
    let expected = concat!(
        "Use [API Protection](https://prot). The [API docs](https://docs/api) help.\n",
        "[Glossary](https://glossary)\n"
    );
    assert_eq!(annotated.annotated.as_deref(), Some(expected));
    assert_eq!(annotated.links.len(), 3);
}

#[test]
fn test_injection_is_stable_on_its_output() {
    let links = vec![
        StructuredLink::new("https://prot", "API Protection"),
        StructuredLink::new("https://api", "API"),
    ];
    let once = inject_links_into_answer("API Protection and the API.", &links);
    let twice = inject_links_into_answer(&once, &links);
    assert_eq!(
        once,
        "[API Protection](https://prot) and the [API](https://api)."
    );
    assert_eq!(twice, once);
}
