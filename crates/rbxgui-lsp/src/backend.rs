//! LSP backend: document store, hover, completion, symbols, and formatting.

use std::collections::HashMap;
use std::sync::Arc;

use rbxgui_editor::Document;
use rbxgui_script::extract::CONTAINER_CLASSES;
use rbxgui_script::{find_by_name, generate_with, Element, ExtractOptions, GenerateOptions};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::analysis::{bindings, completion_context, declaration_lines, member_at, Context};
use crate::knowledge::{any_prop, class_by_name, prop_in_class, PropInfo, PropKind, CLASSES};

// ── Settings ──────────────────────────────────────────────────────────────────

/// `initializationOptions` accepted from the client. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub root_containers: Option<Vec<String>>,
    pub max_source_len: Option<usize>,
    pub max_depth: Option<usize>,
    pub root_binding: Option<String>,
    pub container_binding: Option<String>,
}

impl Settings {
    fn extract_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::default();
        if let Some(names) = &self.root_containers {
            options.root_containers = names.clone();
        }
        if let Some(limit) = self.max_source_len {
            options.max_source_len = limit;
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        options
    }

    fn generate_options(&self) -> GenerateOptions {
        let mut options = GenerateOptions::default();
        if let Some(names) = &self.root_containers {
            options.root_containers = names.clone();
        }
        if let Some(b) = &self.root_binding {
            options.root_binding = b.clone();
        }
        if let Some(b) = &self.container_binding {
            options.container_binding = b.clone();
        }
        options
    }
}

// ── Backend ───────────────────────────────────────────────────────────────────

pub struct Backend {
    client: Client,
    settings: Arc<RwLock<Settings>>,
    docs: Arc<RwLock<HashMap<Url, Document>>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            settings: Arc::new(RwLock::new(Settings::default())),
            docs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn update(&self, uri: Url, text: String) {
        let settings = self.settings.read().await;
        let mut docs = self.docs.write().await;
        let doc = docs
            .entry(uri.clone())
            .or_insert_with(|| Document::with_options(settings.extract_options(), settings.generate_options()));
        if let Err(err) = doc.sync_from_source(text) {
            drop(docs);
            drop(settings);
            self.client
                .show_message(MessageType::WARNING, format!("{}: {}", uri, err))
                .await;
        }
    }
}

// ── LanguageServer impl ───────────────────────────────────────────────────────

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(raw) = params.initialization_options {
            match serde_json::from_value::<Settings>(raw) {
                Ok(settings) => *self.settings.write().await = settings,
                Err(err) => log::warn!("ignoring initializationOptions: {}", err),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![
                        ".".to_string(),
                        "\"".to_string(),
                        "'".to_string(),
                    ]),
                    ..Default::default()
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "rbxgui-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        log::info!("rbxgui-lsp ready");
        self.client
            .log_message(MessageType::INFO, "rbxgui-lsp ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    // ── Document lifecycle ────────────────────────────────────────────────────

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.update(params.text_document.uri, params.text_document.text)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // FULL sync: the last change carries the whole buffer.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.update(params.text_document.uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.docs.write().await.remove(&params.text_document.uri);
    }

    // ── Hover ─────────────────────────────────────────────────────────────────

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = &params.text_document_position_params.position;

        let docs = self.docs.read().await;
        let doc = match docs.get(uri) {
            Some(d) => d,
            None => return Ok(None),
        };
        let text = doc.source();

        let (owner, word) = match member_at(text, pos) {
            Some(w) => w,
            None => return Ok(None),
        };

        if let Some(owner) = owner {
            let classes = bindings(text);
            let prop = match classes.get(owner) {
                Some(class) => prop_in_class(class, word),
                None => any_prop(word),
            };
            return Ok(prop.map(|p| markdown_hover(prop_markdown(p))));
        }

        if let Some(class) = class_by_name(word) {
            return Ok(Some(markdown_hover(format!("**{}**\n\n{}", class.name, class.doc))));
        }

        // A binding or display name: summarize the element it produced.
        let name = bindings(text)
            .contains_key(word)
            .then(|| display_name(text, word))
            .flatten()
            .unwrap_or_else(|| word.to_string());
        Ok(find_by_name(doc.forest(), &name).map(|e| markdown_hover(element_markdown(e))))
    }

    // ── Completion ────────────────────────────────────────────────────────────

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let pos = &params.text_document_position.position;

        let docs = self.docs.read().await;
        let doc = match docs.get(uri) {
            Some(d) => d,
            None => return Ok(None),
        };
        let text = doc.source();

        let items = match completion_context(text, pos) {
            Context::ClassName => class_items(),
            Context::Property { binding } => property_items(bindings(text).get(&binding).map(String::as_str)),
            Context::Value { binding, prop } => {
                let classes = bindings(text);
                let info = match classes.get(&binding) {
                    Some(class) => prop_in_class(class, &prop),
                    None => any_prop(&prop),
                };
                let containers = &doc.generate_options().root_containers;
                info.map(|p| value_items(p, &classes, &binding, containers))
                    .unwrap_or_default()
            }
            Context::Unknown => vec![],
        };

        Ok(Some(CompletionResponse::Array(items)))
    }

    // ── Symbols ───────────────────────────────────────────────────────────────

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let docs = self.docs.read().await;
        let doc = match docs.get(&params.text_document.uri) {
            Some(d) => d,
            None => return Ok(None),
        };
        let lines = declaration_lines(doc.source());
        let symbols = doc.forest().iter().map(|e| element_symbol(e, &lines)).collect();
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    // ── Formatting ────────────────────────────────────────────────────────────

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let docs = self.docs.read().await;
        let doc = match docs.get(&params.text_document.uri) {
            Some(d) => d,
            None => return Ok(None),
        };
        let formatted = generate_with(doc.forest(), doc.generate_options());
        if formatted == doc.source() {
            return Ok(Some(vec![]));
        }
        Ok(Some(vec![TextEdit {
            range: whole_range(doc.source()),
            new_text: formatted,
        }]))
    }
}

// ── Completion item builders ──────────────────────────────────────────────────

fn class_items() -> Vec<CompletionItem> {
    CLASSES
        .iter()
        .map(|c| {
            let mut item = CompletionItem::new_simple(c.name.to_string(), c.doc.to_string());
            item.kind = Some(CompletionItemKind::CLASS);
            item
        })
        .collect()
}

fn property_items(class: Option<&str>) -> Vec<CompletionItem> {
    let props: Vec<&PropInfo> = match class.and_then(class_by_name) {
        Some(info) => info.props.iter().collect(),
        None => {
            // Unknown binding: offer everything once.
            let mut seen = Vec::<&PropInfo>::new();
            for p in CLASSES.iter().flat_map(|c| c.props.iter()) {
                if !seen.iter().any(|s| s.name == p.name) {
                    seen.push(p);
                }
            }
            seen
        }
    };
    props
        .into_iter()
        .map(|p| {
            let mut item = CompletionItem::new_simple(p.name.to_string(), p.kind.label().to_string());
            item.kind = Some(CompletionItemKind::PROPERTY);
            item.documentation = Some(Documentation::String(p.doc.to_string()));
            item
        })
        .collect()
}

fn value_items(
    prop: &PropInfo,
    classes: &HashMap<String, String>,
    binding: &str,
    containers: &[String],
) -> Vec<CompletionItem> {
    if prop.kind == PropKind::Parent {
        let mut targets: Vec<&str> = classes
            .iter()
            .filter(|(b, class)| b.as_str() != binding && takes_children(class))
            .map(|(b, _)| b.as_str())
            .chain(containers.iter().map(String::as_str))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        return targets
            .into_iter()
            .map(|t| {
                let detail = classes.get(t).cloned().unwrap_or_else(|| "root container".to_string());
                let mut item = CompletionItem::new_simple(t.to_string(), detail);
                item.kind = Some(CompletionItemKind::VARIABLE);
                item
            })
            .collect();
    }

    match prop.kind.snippet() {
        Some(snippet) => {
            let mut item = CompletionItem::new_simple(prop.kind.label().to_string(), prop.doc.to_string());
            item.kind = Some(match prop.kind {
                PropKind::Color3 => CompletionItemKind::COLOR,
                _ => CompletionItemKind::VALUE,
            });
            item.insert_text = Some(snippet.to_string());
            item.insert_text_format = Some(InsertTextFormat::SNIPPET);
            vec![item]
        }
        None => vec![],
    }
}

/// Containers and elements, including classes this server has no entry for.
/// Modifiers such as `UICorner` never hold children.
fn takes_children(class: &str) -> bool {
    CONTAINER_CLASSES.contains(&class) || class_by_name(class).is_none_or(|c| c.is_element)
}

// ── Symbols ───────────────────────────────────────────────────────────────────

#[allow(deprecated)]
fn element_symbol(e: &Element, lines: &HashMap<String, u32>) -> DocumentSymbol {
    let name = e.name.clone().unwrap_or_else(|| e.kind.class_name().to_string());
    let line = lines.get(&name).copied().unwrap_or(0);
    let range = Range::new(Position::new(line, 0), Position::new(line, 0));
    let children: Vec<DocumentSymbol> = e.children.iter().map(|c| element_symbol(c, lines)).collect();
    DocumentSymbol {
        name,
        detail: Some(e.kind.class_name().to_string()),
        kind: if e.kind.is_button() { SymbolKind::EVENT } else { SymbolKind::OBJECT },
        tags: None,
        deprecated: None,
        range,
        selection_range: range,
        children: (!children.is_empty()).then_some(children),
    }
}

// ── Misc helpers ──────────────────────────────────────────────────────────────

fn markdown_hover(md: String) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: md,
        }),
        range: None,
    }
}

fn prop_markdown(p: &PropInfo) -> String {
    format!("**{}** · {}\n\n{}", p.name, p.kind.label(), p.doc)
}

fn element_markdown(e: &Element) -> String {
    let mut md = format!("**{}** · {}", e.name.as_deref().unwrap_or("(unnamed)"), e.kind.class_name());
    if let Some(size) = e.size {
        md.push_str(&format!("\n\nSize: {{{}, {}}}, {{{}, {}}}", size.x.scale, size.x.offset, size.y.scale, size.y.offset));
    }
    if let Some(text) = &e.text {
        md.push_str(&format!("\n\nText: `{}`", text));
    }
    if !e.children.is_empty() {
        md.push_str(&format!("\n\n{} child element(s)", e.children.len()));
    }
    md
}

/// The `.Name` given to `binding`, if any.
fn display_name(text: &str, binding: &str) -> Option<String> {
    rbxgui_script::statement::statements(text)
        .filter_map(|(_, stmt)| match stmt {
            rbxgui_script::statement::Statement::Assign { binding: b, property, value }
                if b == binding && property == "Name" =>
            {
                rbxgui_script::value::string(&value)
            }
            _ => None,
        })
        .last()
}

fn whole_range(text: &str) -> Range {
    let lines = text.split('\n').count().max(1) as u32;
    let last = text.rsplit('\n').next().unwrap_or("");
    let width = last.encode_utf16().count() as u32;
    Range::new(Position::new(0, 0), Position::new(lines - 1, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_are_optional() {
        let s: Settings = serde_json::from_value(serde_json::json!({ "rootBinding": "screen" })).unwrap();
        assert_eq!(s.generate_options().root_binding, "screen");
        assert_eq!(s.extract_options(), ExtractOptions::default());
        let s: Settings = serde_json::from_value(serde_json::json!({ "maxDepth": 12 })).unwrap();
        assert_eq!(s.extract_options().max_depth, 12);
    }

    #[test]
    fn whole_range_covers_trailing_line() {
        assert_eq!(whole_range("a\nbc"), Range::new(Position::new(0, 0), Position::new(1, 2)));
        assert_eq!(whole_range("a\n"), Range::new(Position::new(0, 0), Position::new(1, 0)));
        assert_eq!(whole_range(""), Range::new(Position::new(0, 0), Position::new(0, 0)));
    }

    #[test]
    fn parent_values_list_other_bindings_and_containers() {
        let classes: HashMap<String, String> =
            [("a", "Frame"), ("b", "TextLabel"), ("c", "UICorner"), ("s", "ScreenGui"), ("w", "Widget")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let parent = prop_in_class("TextLabel", "Parent").unwrap();
        let labels: Vec<String> = value_items(parent, &classes, "b", &["gui".to_string()])
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["a", "gui", "s", "w"]);
    }

    #[test]
    fn symbols_nest_with_lines() {
        let src = "local p = Instance.new('Frame')\np.Parent = gui\nlocal b = Instance.new('TextButton')\nb.Name = 'Ok'\nb.Parent = p";
        let doc = Document::from_source(src).unwrap();
        let symbols: Vec<_> = doc.forest().iter().map(|e| element_symbol(e, &declaration_lines(src))).collect();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "p");
        let child = &symbols[0].children.as_ref().unwrap()[0];
        assert_eq!(child.name, "Ok");
        assert_eq!(child.range.start.line, 2);
        assert_eq!(child.kind, SymbolKind::EVENT);
    }
}
