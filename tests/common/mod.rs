#![allow(dead_code)]

use setlang_lsp::Backend;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

pub fn create_test_backend() -> Backend {
    Backend::new_test()
}

pub fn test_uri() -> Url {
    Url::parse("file:///test.setl").unwrap()
}

/// Helper: open `text` as `uri` on the backend.
pub async fn open_document(backend: &Backend, uri: &Url, text: &str) {
    let open_params = DidOpenTextDocumentParams {
        text_document: TextDocumentItem {
            uri: uri.clone(),
            language_id: "setlang".to_string(),
            version: 1,
            text: text.to_string(),
        },
    };
    backend.did_open(open_params).await;
}

/// Helper: send a goto-definition request at `line:character`.
pub async fn goto_definition(
    backend: &Backend,
    uri: &Url,
    line: u32,
    character: u32,
) -> Option<GotoDefinitionResponse> {
    let params = GotoDefinitionParams {
        text_document_position_params: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position: Position { line, character },
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
    };
    backend.goto_definition(params).await.unwrap()
}

/// Helper: open `text` in a fresh backend and resolve at `line:character`.
pub async fn definition_in(text: &str, line: u32, character: u32) -> Option<GotoDefinitionResponse> {
    let backend = create_test_backend();
    let uri = test_uri();
    open_document(&backend, &uri, text).await;
    goto_definition(&backend, &uri, line, character).await
}

/// The `(line, character)` start of every returned location, asserting
/// each range is zero-width.
pub fn caret_positions(response: &GotoDefinitionResponse) -> Vec<(u32, u32)> {
    let locations: Vec<&Location> = match response {
        GotoDefinitionResponse::Scalar(location) => vec![location],
        GotoDefinitionResponse::Array(locations) => locations.iter().collect(),
        GotoDefinitionResponse::Link(links) => panic!("Unexpected link response: {:?}", links),
    };
    locations
        .into_iter()
        .map(|location| {
            assert_eq!(
                location.range.start, location.range.end,
                "definition ranges must be zero-width"
            );
            (location.range.start.line, location.range.start.character)
        })
        .collect()
}
