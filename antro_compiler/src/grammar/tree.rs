//! Parse tree nodes and the output builder the parser writes into

use crate::tokens::Token;
use serde::{Deserialize, Serialize};

/// A `{label, children}` node; leaves additionally carry the consumed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTree {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ParseTree>,
}

impl ParseTree {
    /// Production node
    pub fn node(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: None,
            children: Vec::new(),
        }
    }

    /// Token leaf labelled with the token's category
    pub fn leaf(token: Token) -> Self {
        Self {
            label: token.category.as_str().to_string(),
            token: Some(token),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.token.is_some()
    }

    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.label.as_str()).collect()
    }

    /// Number of nodes in this subtree, including itself
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ParseTree::len).sum::<usize>()
    }

    /// Height of this subtree; a lone node has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(ParseTree::depth).max().unwrap_or(0)
    }

    /// First node labelled `label` in pre-order
    pub fn find(&self, label: &str) -> Option<&ParseTree> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(label))
    }

    /// Every node labelled `label` in pre-order
    pub fn find_all<'a>(&'a self, label: &str) -> Vec<&'a ParseTree> {
        let mut found = Vec::new();
        self.collect_labelled(label, &mut found);
        found
    }

    fn collect_labelled<'a>(&'a self, label: &str, found: &mut Vec<&'a ParseTree>) {
        if self.label == label {
            found.push(self);
        }
        for child in &self.children {
            child.collect_labelled(label, found);
        }
    }

    /// Tokens at the leaves, in source order
    pub fn leaves(&self) -> Vec<&Token> {
        match &self.token {
            Some(token) => vec![token],
            None => self.children.iter().flat_map(ParseTree::leaves).collect(),
        }
    }

    /// Leaf lexemes joined with single spaces
    pub fn text(&self) -> String {
        self.leaves()
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Accumulates the tree for one parse.
///
/// Productions open a node with [`begin_production`](Self::begin_production)
/// and either attach it to its parent with
/// [`finish_production`](Self::finish_production) or drop it with
/// [`abandon_production`](Self::abandon_production). Consumed tokens go to the
/// innermost open node, or to the root when none is open.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    root: ParseTree,
    open: Vec<ParseTree>,
    current_production: Option<String>,
}

impl Default for ParseOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOutput {
    pub const ROOT_LABEL: &'static str = "program";

    pub fn new() -> Self {
        Self {
            root: ParseTree::node(Self::ROOT_LABEL),
            open: Vec::new(),
            current_production: None,
        }
    }

    pub fn root(&self) -> &ParseTree {
        &self.root
    }

    /// Name of the innermost open production
    pub fn current_production(&self) -> Option<&str> {
        self.current_production.as_deref()
    }

    /// Number of open productions
    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    fn current_node(&mut self) -> &mut ParseTree {
        match self.open.last_mut() {
            Some(node) => node,
            None => &mut self.root,
        }
    }

    fn refresh_current(&mut self) {
        self.current_production = self.open.last().map(|node| node.label.clone());
    }

    pub fn begin_production(&mut self, label: &str) {
        self.open.push(ParseTree::node(label));
        self.current_production = Some(label.to_string());
    }

    pub fn finish_production(&mut self) {
        if let Some(node) = self.open.pop() {
            self.current_node().children.push(node);
        }
        self.refresh_current();
    }

    pub fn abandon_production(&mut self) {
        self.open.pop();
        self.refresh_current();
    }

    pub fn append_token(&mut self, token: Token) {
        self.current_node().children.push(ParseTree::leaf(token));
    }

    /// Replace the last `count` children of the current node with one node labelled `label`
    pub fn enclose_last(&mut self, label: &str, count: usize) {
        let node = self.current_node();
        let start = node.children.len().saturating_sub(count);
        let children = node.children.split_off(start);
        node.children.push(ParseTree {
            label: label.to_string(),
            token: None,
            children,
        });
    }

    /// Close any productions still open and hand over the tree
    pub fn into_tree(mut self) -> ParseTree {
        while !self.open.is_empty() {
            self.finish_production();
        }
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenCategory;
    use crate::utils::Position;

    fn tok(category: TokenCategory, lexeme: &str) -> Token {
        Token::new(category, lexeme, Position::start())
    }

    #[test]
    fn test_productions_nest_under_root() {
        let mut output = ParseOutput::new();
        output.begin_production("definition");
        assert_eq!(output.current_production(), Some("definition"));
        output.append_token(tok(TokenCategory::Keyword, "def"));
        output.append_token(tok(TokenCategory::Variable, "x"));
        output.finish_production();
        assert_eq!(output.current_production(), None);

        let tree = output.into_tree();
        assert_eq!(tree.label, "program");
        assert_eq!(tree.child_labels(), vec!["definition"]);
        assert_eq!(tree.children[0].child_labels(), vec!["keyword", "variable"]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_abandon_drops_partial_node() {
        let mut output = ParseOutput::new();
        output.begin_production("block");
        output.begin_production("var");
        output.append_token(tok(TokenCategory::Keyword, "var"));
        output.abandon_production();
        assert_eq!(output.current_production(), Some("block"));
        output.finish_production();

        let tree = output.into_tree();
        assert_eq!(tree.child_labels(), vec!["block"]);
        assert!(tree.children[0].children.is_empty());
    }

    #[test]
    fn test_enclose_last_builds_binary_node() {
        let mut output = ParseOutput::new();
        output.append_token(tok(TokenCategory::Variable, "a"));
        output.append_token(tok(TokenCategory::ArithmeticAdd, "+"));
        output.append_token(tok(TokenCategory::Int, "1"));
        output.enclose_last("expression", 3);

        let tree = output.into_tree();
        assert_eq!(tree.child_labels(), vec!["expression"]);
        assert_eq!(tree.children[0].text(), "a + 1");
    }

    #[test]
    fn test_find_and_leaves() {
        let mut output = ParseOutput::new();
        output.begin_production("return");
        output.append_token(tok(TokenCategory::Keyword, "retn"));
        output.append_token(tok(TokenCategory::Terminator, ";"));
        output.finish_production();
        let tree = output.into_tree();

        let ret = tree.find("return").unwrap();
        assert_eq!(ret.leaves().len(), 2);
        assert_eq!(tree.find_all("terminator").len(), 1);
        assert!(tree.find("call").is_none());
    }

    #[test]
    fn test_json_export_omits_empty_fields() {
        let mut output = ParseOutput::new();
        output.append_token(tok(TokenCategory::Terminator, ";"));
        let json = output.into_tree().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["label"], "program");
        assert!(value.get("token").is_none());
        assert_eq!(value["children"][0]["token"]["category"], "terminator");
        assert!(value["children"][0].get("children").is_none());
    }
}
