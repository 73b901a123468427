//! Predictive descent parser over a token stream
//!
//! Every production is a method returning `Ok(true)` when it matched and
//! `Ok(false)` when its optional alternative did not apply. Mismatches at
//! mandatory points are errors. Productions that give up after consuming
//! tokens push them back and discard their partial node, so an optional
//! production either matches fully or leaves no trace.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::runtime::SyntaxPreferences;
use crate::grammar::keywords::{is_reserved_keyword, Keyword};
use crate::grammar::precedence::{binary_precedence, is_prefix_operator, Precedence};
use crate::grammar::tree::{ParseOutput, ParseTree};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{TokenCategory, TokenStream};
use crate::log_debug;

pub struct AntroParser {
    tokens: TokenStream,
    output: ParseOutput,
    preferences: SyntaxPreferences,
    depth: usize,
}

impl AntroParser {
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_preferences(tokens, SyntaxPreferences::default())
    }

    pub fn with_preferences(tokens: TokenStream, preferences: SyntaxPreferences) -> Self {
        log_debug!("Creating parser", "tokens" => tokens.len());

        Self {
            tokens,
            output: ParseOutput::new(),
            preferences,
            depth: 0,
        }
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn output(&self) -> &ParseOutput {
        &self.output
    }

    /// Parse a whole program and hand over the tree
    pub fn parse(mut self) -> SyntaxResult<ParseTree> {
        self.program()?;

        if self.preferences.require_end_of_input {
            self.expect_end_of_input()?;
        }

        Ok(self.output.into_tree())
    }

    // === PRIMITIVES ===

    /// Consume the lookahead into the current node if it has `category`.
    /// A failed optional expectation consumes nothing.
    pub fn expect(&mut self, category: TokenCategory, mandatory: bool) -> SyntaxResult<bool> {
        if self.tokens.lookahead().is_some_and(|token| token.is(category)) {
            self.take();
            return Ok(true);
        }

        if mandatory {
            Err(self.mismatch(category.as_str()))
        } else {
            Ok(false)
        }
    }

    /// Consume the lookahead if it is the keyword `keyword`. A keyword token
    /// that is not a reserved word fails whether or not the match is mandatory.
    pub fn expect_keyword(&mut self, keyword: Keyword, mandatory: bool) -> SyntaxResult<bool> {
        if let Some(token) = self.tokens.lookahead() {
            if token.is(TokenCategory::Keyword) && !is_reserved_keyword(&token.lexeme) {
                return Err(SyntaxError::InvalidKeyword {
                    lexeme: token.lexeme.clone(),
                    line: token.line(),
                });
            }
            if token.is(TokenCategory::Keyword) && token.lexeme == keyword.as_str() {
                self.take();
                return Ok(true);
            }
        }

        if mandatory {
            Err(self.mismatch(&format!("keyword '{}'", keyword)))
        } else {
            Ok(false)
        }
    }

    /// Run `body` as production `label`. On `Ok(false)` every token it consumed
    /// is pushed back and its node is dropped.
    pub fn speculate(
        &mut self,
        label: &str,
        body: impl FnOnce(&mut Self) -> SyntaxResult<bool>,
    ) -> SyntaxResult<bool> {
        self.enter()?;
        let mark = self.tokens.consumed();
        self.output.begin_production(label);

        if self.preferences.log_productions {
            log_debug!("Production entered", "rule" => label, "position" => mark);
        }

        let result = body(self);
        self.exit();

        match result {
            Ok(true) => {
                self.output.finish_production();
                Ok(true)
            }
            Ok(false) => {
                self.output.abandon_production();
                self.tokens
                    .push_back(self.tokens.consumed().saturating_sub(mark))?;
                Ok(false)
            }
            Err(error) => {
                self.output.abandon_production();
                Err(error)
            }
        }
    }

    fn take(&mut self) {
        if let Some(token) = self.tokens.consume() {
            self.output.append_token(token);
        }
    }

    fn enter(&mut self) -> SyntaxResult<()> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                line: self.current_line(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn current_line(&self) -> u32 {
        self.tokens
            .lookahead()
            .or_else(|| self.tokens.history().last())
            .map_or(1, |token| token.line())
    }

    /// Error for a mandatory point that the lookahead does not satisfy
    fn mismatch(&self, expected: &str) -> SyntaxError {
        match self.tokens.lookahead() {
            Some(token) if !token.is_eof() => SyntaxError::UnexpectedToken {
                expected: expected.to_string(),
                actual: token.category,
                lexeme: token.lexeme.clone(),
                line: token.line(),
                column: token.column(),
            },
            _ => SyntaxError::UnexpectedEndOfInput {
                expected: expected.to_string(),
            },
        }
    }

    fn expect_end_of_input(&mut self) -> SyntaxResult<()> {
        match self.tokens.lookahead() {
            None => Ok(()),
            Some(token) if token.is_eof() => {
                self.tokens.consume();
                Ok(())
            }
            Some(token) => Err(SyntaxError::TrailingInput {
                actual: token.category,
                lexeme: token.lexeme.clone(),
                line: token.line(),
                column: token.column(),
            }),
        }
    }

    // === PROGRAM STRUCTURE ===

    /// `{require} {definition} "begin" ":" {statement} "end" ";" {definition}`
    pub fn program(&mut self) -> SyntaxResult<bool> {
        while self.require()? {}
        while self.definition()? {}
        self.program_block()?;
        while self.definition()? {}
        Ok(true)
    }

    /// `"require" ":" string ";"`
    pub fn require(&mut self) -> SyntaxResult<bool> {
        self.speculate("require", |p| {
            if !p.expect_keyword(Keyword::Require, false)? {
                return Ok(false);
            }
            p.expect(TokenCategory::Cursor, true)?;
            p.expect(TokenCategory::String, true)?;
            p.expect(TokenCategory::Terminator, true)
        })
    }

    /// `"def" variable type ";"` where the type is a name
    pub fn definition(&mut self) -> SyntaxResult<bool> {
        self.speculate("definition", |p| {
            if !p.expect_keyword(Keyword::Def, false)? {
                return Ok(false);
            }
            p.expect(TokenCategory::Variable, true)?;
            p.expect(TokenCategory::Variable, true)?;
            p.expect(TokenCategory::Terminator, true)
        })
    }

    /// `"begin" ":" {statement} "end" ";"`
    pub fn program_block(&mut self) -> SyntaxResult<bool> {
        self.speculate("program_block", |p| {
            p.expect_keyword(Keyword::Begin, true)?;
            p.expect(TokenCategory::Cursor, true)?;
            while p.statement()? {}
            p.expect_keyword(Keyword::End, true)?;
            p.expect(TokenCategory::Terminator, true)
        })
    }

    // === STATEMENTS ===

    pub fn statement(&mut self) -> SyntaxResult<bool> {
        Ok(self.definition()?
            || self.return_statement()?
            || self.call_statement()?
            || self.var_statement()?
            || self.if_statement()?
            || self.while_statement()?)
    }

    /// `"retn" [variable] ";"`
    pub fn return_statement(&mut self) -> SyntaxResult<bool> {
        self.speculate("return", |p| {
            if !p.expect_keyword(Keyword::Retn, false)? {
                return Ok(false);
            }
            p.expect(TokenCategory::Variable, false)?;
            p.expect(TokenCategory::Terminator, true)
        })
    }

    /// `"call" variable "(" arguments ")" ";"`
    pub fn call_statement(&mut self) -> SyntaxResult<bool> {
        self.speculate("call", |p| {
            if !p.expect_keyword(Keyword::Call, false)? {
                return Ok(false);
            }
            p.expect(TokenCategory::Variable, true)?;
            p.expect(TokenCategory::OpenBracket, true)?;
            p.arguments()?;
            p.expect(TokenCategory::CloseBracket, true)?;
            p.expect(TokenCategory::Terminator, true)
        })
    }

    /// `[argument {[","] argument}]`; the node is present even when empty
    pub fn arguments(&mut self) -> SyntaxResult<bool> {
        self.speculate("arguments", |p| {
            if !p.argument()? {
                return Ok(true);
            }
            loop {
                let separated = p.expect(TokenCategory::Comma, false)?;
                if !p.argument()? {
                    if separated {
                        return Err(p.mismatch("argument"));
                    }
                    return Ok(true);
                }
            }
        })
    }

    /// A string or any expression
    pub fn argument(&mut self) -> SyntaxResult<bool> {
        self.expression()
    }

    /// `"var" variable "=" expression ";"`
    pub fn var_statement(&mut self) -> SyntaxResult<bool> {
        self.speculate("var", |p| {
            if !p.expect_keyword(Keyword::Var, false)? {
                return Ok(false);
            }
            p.expect(TokenCategory::Variable, true)?;
            p.expect(TokenCategory::AssignmentOp, true)?;
            p.require_expression()?;
            p.expect(TokenCategory::Terminator, true)
        })
    }

    /// `"if" "(" condition ")" block ["else" (if | block)]`
    pub fn if_statement(&mut self) -> SyntaxResult<bool> {
        self.speculate("if", |p| {
            if !p.expect_keyword(Keyword::If, false)? {
                return Ok(false);
            }
            p.guarded_block()?;
            if p.expect_keyword(Keyword::Else, false)? && !p.if_statement()? {
                p.require_block()?;
            }
            Ok(true)
        })
    }

    /// `"while" "(" condition ")" block`
    pub fn while_statement(&mut self) -> SyntaxResult<bool> {
        self.speculate("while", |p| {
            if !p.expect_keyword(Keyword::While, false)? {
                return Ok(false);
            }
            p.guarded_block()?;
            Ok(true)
        })
    }

    fn guarded_block(&mut self) -> SyntaxResult<()> {
        self.expect(TokenCategory::OpenBracket, true)?;
        if !self.condition()? {
            return Err(self.mismatch("condition"));
        }
        self.expect(TokenCategory::CloseBracket, true)?;
        self.require_block()
    }

    /// `"{" {statement} "}"`
    pub fn block(&mut self) -> SyntaxResult<bool> {
        self.speculate("block", |p| {
            if !p.expect(TokenCategory::OpenBrace, false)? {
                return Ok(false);
            }
            while p.statement()? {}
            p.expect(TokenCategory::CloseBrace, true)
        })
    }

    fn require_block(&mut self) -> SyntaxResult<()> {
        if self.block()? {
            Ok(())
        } else {
            Err(self.mismatch(TokenCategory::OpenBrace.as_str()))
        }
    }

    // === EXPRESSIONS ===

    pub fn condition(&mut self) -> SyntaxResult<bool> {
        self.speculate("condition", |p| p.expression())
    }

    /// Operand sequence joined by binary operators, grouped by precedence.
    /// All operators of one level form a single flat `expression` node
    /// (`operand op operand op ...`, read left to right); a lone operand is
    /// wrapped once.
    pub fn expression(&mut self) -> SyntaxResult<bool> {
        self.enter()?;
        let folded = self.binary(Precedence::LOWEST);
        self.exit();

        match folded? {
            None => Ok(false),
            Some(true) => Ok(true),
            Some(false) => {
                self.output.enclose_last("expression", 1);
                Ok(true)
            }
        }
    }

    fn require_expression(&mut self) -> SyntaxResult<()> {
        if self.expression()? {
            Ok(())
        } else {
            Err(self.mismatch("expression"))
        }
    }

    /// Operators at `level` and tighter. `None` when no operand starts here,
    /// otherwise whether an `expression` node was produced.
    fn binary(&mut self, level: Precedence) -> SyntaxResult<Option<bool>> {
        let Some(mut folded) = self.operand(level)? else {
            return Ok(None);
        };

        let mut operators = 0;
        while self.tokens.lookahead().and_then(binary_precedence) == Some(level) {
            self.take();
            if self.operand(level)?.is_none() {
                return Err(self.mismatch("expression"));
            }
            operators += 1;
        }

        if operators > 0 {
            self.output.enclose_last("expression", 2 * operators + 1);
            folded = true;
        }
        Ok(Some(folded))
    }

    /// One operand of an operator at `level`
    fn operand(&mut self, level: Precedence) -> SyntaxResult<Option<bool>> {
        match level.tighter() {
            Some(tighter) => self.binary(tighter),
            None => Ok(self.unary()?.then_some(false)),
        }
    }

    /// `("!" | "-" | "+" | "++" | "--") unary | factor`
    pub fn unary(&mut self) -> SyntaxResult<bool> {
        let prefixed = self
            .tokens
            .lookahead()
            .is_some_and(|token| is_prefix_operator(token.category));
        if !prefixed {
            return self.factor();
        }

        self.speculate("unary", |p| {
            p.take();
            if p.unary()? {
                Ok(true)
            } else {
                Err(p.mismatch("expression"))
            }
        })
    }

    /// `variable | int | float | boolean | string | "(" expression ")"`
    pub fn factor(&mut self) -> SyntaxResult<bool> {
        self.speculate("factor", |p| {
            for category in [
                TokenCategory::Variable,
                TokenCategory::Int,
                TokenCategory::Float,
                TokenCategory::Boolean,
                TokenCategory::String,
            ] {
                if p.expect(category, false)? {
                    return Ok(true);
                }
            }

            if !p.expect(TokenCategory::OpenBracket, false)? {
                return Ok(false);
            }
            p.require_expression()?;
            p.expect(TokenCategory::CloseBracket, true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::LexicalPreferences;
    use crate::lexical::tokenize_with_preferences;
    use crate::tokens::Token;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    fn stream(source: &str) -> TokenStream {
        tokenize_with_preferences(source, LexicalPreferences::default()).expect("tokenize")
    }

    fn parser(source: &str) -> AntroParser {
        AntroParser::with_preferences(stream(source), SyntaxPreferences::default())
    }

    fn parse(source: &str) -> SyntaxResult<ParseTree> {
        parser(source).parse()
    }

    /// Body of the single statement inside `begin: ... end;`
    fn statement_tree(statement: &str) -> ParseTree {
        let tree = parse(&format!("begin: {} end;", statement)).expect("parse");
        let block = tree.find("program_block").expect("program block").clone();
        block.children[2].clone()
    }

    #[test]
    fn test_definition_and_block() {
        let tree = parse("def x int; begin: retn x; end;").expect("parse");
        assert_eq!(tree.label, "program");
        assert_eq!(tree.child_labels(), vec!["definition", "program_block"]);

        let definition = &tree.children[0];
        assert_eq!(
            definition.child_labels(),
            vec!["keyword", "variable", "variable", "terminator"]
        );

        let block = &tree.children[1];
        assert_eq!(
            block.child_labels(),
            vec!["keyword", "cursor", "return", "keyword", "terminator"]
        );
        assert_eq!(block.children[2].text(), "retn x ;");
    }

    #[test]
    fn test_missing_terminator_reports_found_keyword() {
        let err = parse("def x int begin: end;").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedToken {
                expected: "terminator".to_string(),
                actual: TokenCategory::Keyword,
                lexeme: "begin".to_string(),
                line: 1,
                column: 11,
            }
        );
    }

    #[test]
    fn test_require_consumes_statement_in_full() {
        let mut parser = parser("require:\"io\";");
        assert!(parser.require().expect("require"));
        assert_eq!(parser.tokens().remaining(), 0);
        assert!(parser.tokens().lookahead().is_none());
    }

    #[test]
    fn test_program_sections_in_order() {
        let source = "require:\"io\";\ndef a int;\nbegin:\nend;\ndef b float;";
        let tree = parse(source).expect("parse");
        assert_eq!(
            tree.child_labels(),
            vec!["require", "definition", "program_block", "definition"]
        );
    }

    #[test]
    fn test_optional_expect_consumes_nothing() {
        let mut parser = parser("retn;");
        assert!(!parser.expect(TokenCategory::Variable, false).unwrap());
        assert_eq!(parser.tokens().consumed(), 0);
        assert!(parser.expect_keyword(Keyword::Retn, false).unwrap());
        assert!(!parser.expect_keyword(Keyword::Call, false).unwrap());
        assert_eq!(parser.tokens().consumed(), 1);
    }

    #[test]
    fn test_mandatory_expect_at_end_of_input() {
        let mut parser = parser("retn");
        parser.expect_keyword(Keyword::Retn, true).unwrap();
        let err = parser.expect(TokenCategory::Terminator, true).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedEndOfInput {
                expected: "terminator".to_string()
            }
        );
    }

    #[test]
    fn test_empty_program_is_end_of_input() {
        let err = parse("").unwrap_err();
        assert_matches!(err, SyntaxError::UnexpectedEndOfInput { .. });

        let with_eof = tokenize_with_preferences(
            "def x int;",
            LexicalPreferences {
                emit_eof_token: true,
                ..LexicalPreferences::default()
            },
        )
        .unwrap();
        let err = AntroParser::new(with_eof).parse().unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedEndOfInput {
                expected: "keyword 'begin'".to_string()
            }
        );
    }

    #[test]
    fn test_unreserved_keyword_token_is_fatal() {
        let tokens = vec![Token::new(TokenCategory::Keyword, "goto", Position::start())];
        let mut parser = AntroParser::new(TokenStream::from_tokens(tokens));
        let err = parser.expect_keyword(Keyword::Def, false).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::InvalidKeyword {
                lexeme: "goto".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_speculate_restores_tokens_and_drops_node() {
        let mut parser = parser("x y z");
        let matched = parser
            .speculate("probe", |p| {
                p.expect(TokenCategory::Variable, true)?;
                p.expect(TokenCategory::Variable, true)?;
                Ok(false)
            })
            .unwrap();

        assert!(!matched);
        assert_eq!(parser.tokens().consumed(), 0);
        assert_eq!(parser.tokens().lookahead().unwrap().lexeme, "x");
        assert!(parser.output().root().children.is_empty());
        assert_eq!(parser.output().open_depth(), 0);
    }

    #[test]
    fn test_trailing_input() {
        let err = parse("begin: end; retn;").unwrap_err();
        assert_matches!(err, SyntaxError::TrailingInput { line: 1, column: 13, .. });

        let lenient = AntroParser::with_preferences(
            stream("begin: end; retn;"),
            SyntaxPreferences {
                require_end_of_input: false,
                ..SyntaxPreferences::default()
            },
        );
        assert!(lenient.parse().is_ok());
    }

    #[test]
    fn test_eof_marker_is_accepted_after_program() {
        let tokens = tokenize_with_preferences(
            "begin: end;\n",
            LexicalPreferences {
                emit_eof_token: true,
                ..LexicalPreferences::default()
            },
        )
        .unwrap();
        let tree = AntroParser::new(tokens).parse().expect("parse");
        assert!(tree.find("eof").is_none());
    }

    #[test]
    fn test_call_arguments() {
        let call = statement_tree("call print(\"total\", x 42);");
        assert_eq!(call.label, "call");
        let arguments = call.find("arguments").unwrap();
        assert_eq!(
            arguments.child_labels(),
            vec!["expression", "comma", "expression", "expression"]
        );

        let empty = statement_tree("call flush();");
        assert!(empty.find("arguments").unwrap().children.is_empty());

        let err = parse("begin: call f(x,); end;").unwrap_err();
        assert_matches!(err, SyntaxError::UnexpectedToken { ref expected, .. } if expected == "argument");
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let var = statement_tree("var r = a + b * c;");
        let expression = var.find("expression").unwrap();
        assert_eq!(
            expression.child_labels(),
            vec!["factor", "arithmetic_add", "expression"]
        );
        assert_eq!(expression.children[2].text(), "b * c");
    }

    #[test]
    fn test_same_level_operators_share_one_node() {
        let var = statement_tree("var r = a - b + c;");
        let expression = var.find("expression").unwrap();
        assert_eq!(
            expression.child_labels(),
            vec!["factor", "arithmetic_sub", "factor", "arithmetic_add", "factor"]
        );
        assert_eq!(expression.text(), "a - b + c");
    }

    #[test]
    fn test_long_operator_chain_stays_shallow() {
        let terms = 100_000;
        let chain = vec!["1"; terms].join(" + ");
        let tree = parse(&format!("begin: var x = {}; end;", chain)).expect("parse");

        let expression = tree.find("expression").unwrap();
        assert_eq!(expression.children.len(), 2 * terms - 1);
        assert!(tree.depth() < 10);
        assert!(tree.len() > 2 * terms);
    }

    #[test]
    fn test_logical_and_relational_levels() {
        let var = statement_tree("var ok = a < 1 || b == 2 && !c;");
        let expression = var.find("expression").unwrap();
        assert_eq!(expression.children[1].text(), "||");
        assert_eq!(expression.children[0].text(), "a < 1");
        assert_eq!(expression.children[2].children[1].text(), "&&");
    }

    #[test]
    fn test_unary_and_parentheses() {
        let var = statement_tree("var n = -(x + 1) * 2;");
        let expression = var.find("expression").unwrap();
        assert_eq!(expression.children[0].label, "unary");
        assert_eq!(expression.children[0].children[1].label, "factor");

        let var = statement_tree("var n = -5;");
        let operand = var.find("expression").unwrap();
        assert_eq!(operand.child_labels(), vec!["factor"]);
        assert_eq!(operand.text(), "-5");
    }

    #[test]
    fn test_operator_without_right_operand() {
        let err = parse("begin: var n = x + ; end;").unwrap_err();
        assert_matches!(
            err,
            SyntaxError::UnexpectedToken { ref expected, actual: TokenCategory::Terminator, .. }
                if expected == "expression"
        );
    }

    #[test]
    fn test_if_else_and_while() {
        let stmt = statement_tree("if (x > 1) { retn x; } else { retn; }");
        assert_eq!(stmt.label, "if");
        assert_eq!(stmt.find_all("block").len(), 2);
        assert_eq!(stmt.find("condition").unwrap().text(), "x > 1");

        let stmt = statement_tree("if (x) { retn; } else if (y) { retn y; } else { retn x; }");
        let chained = stmt.find_all("if");
        assert_eq!(chained.len(), 2);
        assert_eq!(chained[1].find("condition").unwrap().text(), "y");
        assert_eq!(stmt.find_all("block").len(), 3);

        let stmt = statement_tree("while (true) { var i = i + 1; }");
        assert_eq!(stmt.label, "while");
        let block = stmt.find("block").unwrap();
        assert_eq!(block.child_labels(), vec!["open_brace", "var", "close_brace"]);

        let err = parse("begin: while (x) retn; end;").unwrap_err();
        assert_matches!(err, SyntaxError::UnexpectedToken { ref expected, .. } if expected == "open_brace");
    }

    #[test]
    fn test_nesting_is_bounded() {
        let depth = MAX_PARSE_DEPTH + 1;
        let source = format!("begin: var x = {}1{}; end;", "(".repeat(depth), ")".repeat(depth));
        let err = parse(&source).unwrap_err();
        assert_matches!(err, SyntaxError::MaxRecursionDepth { line: 1 });
    }
}
