//! Lexer and recursive-descent parser for the analyzed mini language.
//!
//! The language is a C-like fragment over scalar `int` variables:
//!
//! ```text
//! /*!npre 0 <= x <= 10*/
//! int y;
//! y = x + 1;
//! if (y < 5) { y = y * 2; } else { y = y - 1; }
//! while (y < 20) { y = y + 1; }
//! /*!npost y == 20*/
//! ```
//!
//! `/*!npre ..*/` constrains an input variable to a range before the program
//! runs; `/*!npost ..*/` asserts a condition on the final state. Ordinary
//! `/* .. */` and `// ..` comments are skipped.
//!
//! Errors are reported as strings with the offending line number.

use crate::ast::{AstNode, BinOp, LogicOp, NodeKind};
use crate::types::NodeId;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    KwInt,
    KwIf,
    KwElse,
    KwWhile,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semi,
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    Ne,
    /// Start of a `/*!npre ..*/` annotation.
    Npre,
    /// Start of a `/*!npost ..*/` annotation.
    Npost,
    /// The `*/` closing an annotation.
    AnnotEnd,
}

fn token_name(token: Option<&Token>) -> String {
    match token {
        None => "end of input".to_string(),
        Some(Token::Ident(name)) => format!("identifier `{}`", name),
        Some(Token::Int(n)) => format!("integer `{}`", n),
        Some(Token::KwInt) => "`int`".to_string(),
        Some(Token::KwIf) => "`if`".to_string(),
        Some(Token::KwElse) => "`else`".to_string(),
        Some(Token::KwWhile) => "`while`".to_string(),
        Some(Token::LParen) => "`(`".to_string(),
        Some(Token::RParen) => "`)`".to_string(),
        Some(Token::LBrace) => "`{`".to_string(),
        Some(Token::RBrace) => "`}`".to_string(),
        Some(Token::Semi) => "`;`".to_string(),
        Some(Token::Comma) => "`,`".to_string(),
        Some(Token::Plus) => "`+`".to_string(),
        Some(Token::Minus) => "`-`".to_string(),
        Some(Token::Star) => "`*`".to_string(),
        Some(Token::Slash) => "`/`".to_string(),
        Some(Token::Assign) => "`=`".to_string(),
        Some(Token::Lt) => "`<`".to_string(),
        Some(Token::Le) => "`<=`".to_string(),
        Some(Token::Gt) => "`>`".to_string(),
        Some(Token::Ge) => "`>=`".to_string(),
        Some(Token::EqEq) => "`==`".to_string(),
        Some(Token::Ne) => "`!=`".to_string(),
        Some(Token::Npre) => "`/*!npre`".to_string(),
        Some(Token::Npost) => "`/*!npost`".to_string(),
        Some(Token::AnnotEnd) => "`*/`".to_string(),
    }
}

fn starts_with(chars: &[char], at: usize, needle: &str) -> bool {
    needle.chars().enumerate().all(|(k, c)| chars.get(at + k) == Some(&c))
}

fn lex(input: &str) -> Result<Vec<(Token, usize)>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut in_annotation = false;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            _ if c.is_whitespace() => i += 1,

            '/' if starts_with(&chars, i, "//") => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if starts_with(&chars, i, "/*!npre") => {
                tokens.push((Token::Npre, line));
                in_annotation = true;
                i += "/*!npre".len();
            }
            '/' if starts_with(&chars, i, "/*!npost") => {
                tokens.push((Token::Npost, line));
                in_annotation = true;
                i += "/*!npost".len();
            }
            '/' if starts_with(&chars, i, "/*") => {
                let opened_at = line;
                i += 2;
                while i < chars.len() && !starts_with(&chars, i, "*/") {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(format!("line {}: unterminated comment", opened_at));
                }
                i += 2;
            }
            '*' if in_annotation && starts_with(&chars, i, "*/") => {
                tokens.push((Token::AnnotEnd, line));
                in_annotation = false;
                i += 2;
            }

            '(' => {
                tokens.push((Token::LParen, line));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, line));
                i += 1;
            }
            '{' => {
                tokens.push((Token::LBrace, line));
                i += 1;
            }
            '}' => {
                tokens.push((Token::RBrace, line));
                i += 1;
            }
            ';' => {
                tokens.push((Token::Semi, line));
                i += 1;
            }
            ',' => {
                tokens.push((Token::Comma, line));
                i += 1;
            }
            '+' => {
                tokens.push((Token::Plus, line));
                i += 1;
            }
            '-' => {
                tokens.push((Token::Minus, line));
                i += 1;
            }
            '*' => {
                tokens.push((Token::Star, line));
                i += 1;
            }
            '/' => {
                tokens.push((Token::Slash, line));
                i += 1;
            }
            '<' => {
                if starts_with(&chars, i, "<=") {
                    tokens.push((Token::Le, line));
                    i += 2;
                } else {
                    tokens.push((Token::Lt, line));
                    i += 1;
                }
            }
            '>' => {
                if starts_with(&chars, i, ">=") {
                    tokens.push((Token::Ge, line));
                    i += 2;
                } else {
                    tokens.push((Token::Gt, line));
                    i += 1;
                }
            }
            '=' => {
                if starts_with(&chars, i, "==") {
                    tokens.push((Token::EqEq, line));
                    i += 2;
                } else {
                    tokens.push((Token::Assign, line));
                    i += 1;
                }
            }
            '!' => {
                if starts_with(&chars, i, "!=") {
                    tokens.push((Token::Ne, line));
                    i += 2;
                } else {
                    return Err(format!("line {}: unexpected character `!`", line));
                }
            }

            _ if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value: i64 = text
                    .parse()
                    .map_err(|_| format!("line {}: integer `{}` is out of range", line, text))?;
                tokens.push((Token::Int(value), line));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let token = match text.as_str() {
                    "int" => Token::KwInt,
                    "if" => Token::KwIf,
                    "else" => Token::KwElse,
                    "while" => Token::KwWhile,
                    _ => Token::Ident(text),
                };
                tokens.push((token, line));
            }

            _ => return Err(format!("line {}: unexpected character `{}`", line, c)),
        }
    }

    if in_annotation {
        return Err(format!("line {}: unterminated annotation", line));
    }
    Ok(tokens)
}

/// Parses a source program into its syntax tree.
///
/// The root is always a [`NodeKind::Sequence`]. Node ids are assigned in
/// construction order, children before parents.
pub fn parse(input: &str) -> Result<AstNode, String> {
    let tokens = lex(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        next_id: 0,
    };
    parser.parse_program()
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    next_id: usize,
}

impl Parser {
    fn node(&mut self, kind: NodeKind) -> AstNode {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        AstNode::new(id, kind)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, l)| *l)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), String> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(format!(
                "line {}: expected {}, found {}",
                self.line(),
                token_name(Some(&token)),
                token_name(self.peek())
            ))
        }
    }

    fn parse_program(&mut self) -> Result<AstNode, String> {
        let mut items = Vec::new();
        while self.peek().is_some() {
            items.append(&mut self.parse_item()?);
        }
        Ok(self.node(NodeKind::Sequence(items)))
    }

    /// One syntactic item. Declaration lists (`int x, y;`) expand into one
    /// node per variable, hence the vector.
    fn parse_item(&mut self) -> Result<Vec<AstNode>, String> {
        match self.peek() {
            Some(Token::KwInt) => self.parse_declaration(),
            Some(Token::Ident(_)) => Ok(vec![self.parse_assignment()?]),
            Some(Token::KwIf) => Ok(vec![self.parse_if()?]),
            Some(Token::KwWhile) => Ok(vec![self.parse_while()?]),
            Some(Token::Npre) => Ok(vec![self.parse_precondition()?]),
            Some(Token::Npost) => Ok(vec![self.parse_postcondition()?]),
            other => Err(format!(
                "line {}: expected a statement, found {}",
                self.line(),
                token_name(other)
            )),
        }
    }

    fn parse_declaration(&mut self) -> Result<Vec<AstNode>, String> {
        self.expect(Token::KwInt)?;
        let mut declarations = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let var = self.node(NodeKind::Variable(name));
            let declaration = self.node(NodeKind::Declaration(Box::new(var)));
            declarations.push(declaration);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::Semi)?;
        Ok(declarations)
    }

    fn parse_assignment(&mut self) -> Result<AstNode, String> {
        let name = self.expect_ident()?;
        let target = self.node(NodeKind::Variable(name));
        self.expect(Token::Assign)?;
        let rhs = self.parse_expr()?;
        self.expect(Token::Semi)?;
        Ok(self.node(NodeKind::Assignment(Box::new(target), Box::new(rhs))))
    }

    fn parse_if(&mut self) -> Result<AstNode, String> {
        self.expect(Token::KwIf)?;
        self.expect(Token::LParen)?;
        let condition = self.parse_condition()?;
        self.expect(Token::RParen)?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.eat(&Token::KwElse) {
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };
        Ok(self.node(NodeKind::IfElse {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
        }))
    }

    fn parse_while(&mut self) -> Result<AstNode, String> {
        self.expect(Token::KwWhile)?;
        self.expect(Token::LParen)?;
        let condition = self.parse_condition()?;
        self.expect(Token::RParen)?;
        let body = self.parse_block()?;
        Ok(self.node(NodeKind::While {
            condition: Box::new(condition),
            body: Box::new(body),
        }))
    }

    fn parse_block(&mut self) -> Result<AstNode, String> {
        self.expect(Token::LBrace)?;
        let mut items = Vec::new();
        while !matches!(self.peek(), Some(Token::RBrace)) {
            if self.peek().is_none() {
                return Err(format!("line {}: unclosed block", self.line()));
            }
            items.append(&mut self.parse_item()?);
        }
        self.expect(Token::RBrace)?;
        Ok(self.node(NodeKind::Sequence(items)))
    }

    /// `/*!npre lo <= v <= hi*/`, emitted in the conventional shape
    /// `(>=, lo, v)` and `(<=, hi, v)` the equation builder destructures.
    fn parse_precondition(&mut self) -> Result<AstNode, String> {
        self.expect(Token::Npre)?;
        let low = self.parse_signed_int()?;
        self.expect(Token::Le)?;
        let name = self.expect_ident()?;
        self.expect(Token::Le)?;
        let high = self.parse_signed_int()?;
        self.expect(Token::AnnotEnd)?;

        let low_node = self.node(NodeKind::Integer(low));
        let low_var = self.node(NodeKind::Variable(name.clone()));
        let low_part = self.node(NodeKind::Logic(LogicOp::Ge, Box::new(low_node), Box::new(low_var)));

        let high_node = self.node(NodeKind::Integer(high));
        let high_var = self.node(NodeKind::Variable(name));
        let high_part = self.node(NodeKind::Logic(LogicOp::Le, Box::new(high_node), Box::new(high_var)));

        Ok(self.node(NodeKind::PreCondition(vec![low_part, high_part])))
    }

    /// `/*!npost cond*/`, where `cond` is either a single comparison or a
    /// range `lo <= v <= hi` that desugars into two comparisons.
    fn parse_postcondition(&mut self) -> Result<AstNode, String> {
        self.expect(Token::Npost)?;

        let parts = if let Some((low, name, high)) = self.try_range() {
            let low_node = self.node(NodeKind::Integer(low));
            let low_var = self.node(NodeKind::Variable(name.clone()));
            let low_part = self.node(NodeKind::Logic(LogicOp::Le, Box::new(low_node), Box::new(low_var)));

            let high_var = self.node(NodeKind::Variable(name));
            let high_node = self.node(NodeKind::Integer(high));
            let high_part = self.node(NodeKind::Logic(LogicOp::Le, Box::new(high_var), Box::new(high_node)));

            vec![low_part, high_part]
        } else {
            vec![self.parse_condition()?]
        };

        self.expect(Token::AnnotEnd)?;
        Ok(self.node(NodeKind::PostCondition(parts)))
    }

    /// Attempts to match `lo <= v <= hi` by tokens alone, rewinding on any
    /// mismatch.
    fn try_range(&mut self) -> Option<(i64, String, i64)> {
        let saved = self.pos;
        let result = (|| {
            let low = self.try_signed_int()?;
            if !self.eat(&Token::Le) {
                return None;
            }
            let name = match self.advance() {
                Some(Token::Ident(name)) => name,
                _ => return None,
            };
            if !self.eat(&Token::Le) {
                return None;
            }
            let high = self.try_signed_int()?;
            if !matches!(self.peek(), Some(Token::AnnotEnd)) {
                return None;
            }
            Some((low, name, high))
        })();
        if result.is_none() {
            self.pos = saved;
        }
        result
    }

    fn try_signed_int(&mut self) -> Option<i64> {
        let saved = self.pos;
        let negative = self.eat(&Token::Minus);
        match self.advance() {
            Some(Token::Int(n)) => Some(if negative { -n } else { n }),
            _ => {
                self.pos = saved;
                None
            }
        }
    }

    fn parse_signed_int(&mut self) -> Result<i64, String> {
        self.try_signed_int()
            .ok_or_else(|| format!("line {}: expected an integer, found {}", self.line(), token_name(self.peek())))
    }

    fn parse_condition(&mut self) -> Result<AstNode, String> {
        let left = self.parse_expr()?;
        let op = match self.peek() {
            Some(Token::Lt) => LogicOp::Lt,
            Some(Token::Le) => LogicOp::Le,
            Some(Token::Gt) => LogicOp::Gt,
            Some(Token::Ge) => LogicOp::Ge,
            Some(Token::EqEq) => LogicOp::Eq,
            Some(Token::Ne) => LogicOp::Ne,
            other => {
                return Err(format!(
                    "line {}: expected a comparison operator, found {}",
                    self.line(),
                    token_name(other)
                ))
            }
        };
        self.advance();
        let right = self.parse_expr()?;
        Ok(self.node(NodeKind::Logic(op, Box::new(left), Box::new(right))))
    }

    fn parse_expr(&mut self) -> Result<AstNode, String> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = self.node(NodeKind::Arithmetic(op, Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<AstNode, String> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = self.node(NodeKind::Arithmetic(op, Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<AstNode, String> {
        match self.peek().cloned() {
            Some(Token::Int(n)) => {
                self.advance();
                Ok(self.node(NodeKind::Integer(n)))
            }
            Some(Token::Minus) => {
                self.advance();
                // A negated literal is folded; anything else becomes 0 - e.
                if let Some(Token::Int(n)) = self.peek().cloned() {
                    self.advance();
                    Ok(self.node(NodeKind::Integer(-n)))
                } else {
                    let operand = self.parse_factor()?;
                    let zero = self.node(NodeKind::Integer(0));
                    Ok(self.node(NodeKind::Arithmetic(BinOp::Sub, Box::new(zero), Box::new(operand))))
                }
            }
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(self.node(NodeKind::Variable(name)))
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => Err(format!(
                "line {}: expected an expression, found {}",
                self.line(),
                token_name(other.as_ref())
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<String, String> {
        match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(name)
            }
            other => Err(format!(
                "line {}: expected an identifier, found {}",
                self.line(),
                token_name(other.as_ref())
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_items(source: &str) -> Vec<AstNode> {
        match parse(source).unwrap().kind {
            NodeKind::Sequence(items) => items,
            other => panic!("root must be a sequence, found {:?}", other),
        }
    }

    #[test]
    fn test_declaration_and_assignment() {
        let items = root_items("int x; x = 3;");
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0].kind, NodeKind::Declaration(_)));
        match &items[1].kind {
            NodeKind::Assignment(target, rhs) => {
                assert_eq!(target.variable_name(), Some("x"));
                assert_eq!(rhs.kind, NodeKind::Integer(3));
            }
            other => panic!("expected an assignment, found {:?}", other),
        }
    }

    #[test]
    fn test_declaration_list_expands() {
        let items = root_items("int x, y, z;");
        assert_eq!(items.len(), 3);
        for item in &items {
            assert!(matches!(item.kind, NodeKind::Declaration(_)));
        }
    }

    #[test]
    fn test_node_ids_are_unique() {
        let root = parse("int x; x = 1 + 2 * 3; /*!npost x == 7*/").unwrap();
        let mut ids = Vec::new();
        fn collect(node: &AstNode, ids: &mut Vec<usize>) {
            ids.push(node.id.index());
            for child in node.children() {
                collect(child, ids);
            }
        }
        collect(&root, &mut ids);
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count, "node ids must be unique");
    }

    #[test]
    fn test_precedence() {
        let items = root_items("int x; x = 1 + 2 * 3;");
        match &items[1].kind {
            NodeKind::Assignment(_, rhs) => match &rhs.kind {
                NodeKind::Arithmetic(BinOp::Add, left, right) => {
                    assert_eq!(left.kind, NodeKind::Integer(1));
                    assert!(matches!(right.kind, NodeKind::Arithmetic(BinOp::Mul, _, _)));
                }
                other => panic!("expected addition at the root, found {:?}", other),
            },
            other => panic!("expected an assignment, found {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let items = root_items("int x; x = (1 + 2) * 3;");
        match &items[1].kind {
            NodeKind::Assignment(_, rhs) => {
                assert!(matches!(rhs.kind, NodeKind::Arithmetic(BinOp::Mul, _, _)));
            }
            other => panic!("expected an assignment, found {:?}", other),
        }
    }

    #[test]
    fn test_negative_literal() {
        let items = root_items("int x; x = -100;");
        match &items[1].kind {
            NodeKind::Assignment(_, rhs) => assert_eq!(rhs.kind, NodeKind::Integer(-100)),
            other => panic!("expected an assignment, found {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus_on_variable() {
        let items = root_items("int x; int y; y = -x;");
        match &items[2].kind {
            NodeKind::Assignment(_, rhs) => match &rhs.kind {
                NodeKind::Arithmetic(BinOp::Sub, left, right) => {
                    assert_eq!(left.kind, NodeKind::Integer(0));
                    assert_eq!(right.variable_name(), Some("x"));
                }
                other => panic!("expected 0 - x, found {:?}", other),
            },
            other => panic!("expected an assignment, found {:?}", other),
        }
    }

    #[test]
    fn test_if_else_and_while() {
        let items = root_items(
            "int x; x = 0; if (x < 5) { x = 1; } else { x = 2; } while (x < 9) { x = x + 1; }",
        );
        assert!(matches!(items[2].kind, NodeKind::IfElse { .. }));
        if let NodeKind::IfElse { else_branch, .. } = &items[2].kind {
            assert!(else_branch.is_some());
        }
        assert!(matches!(items[3].kind, NodeKind::While { .. }));
    }

    #[test]
    fn test_precondition_shape() {
        let items = root_items("/*!npre -5 <= x <= 5*/");
        match &items[0].kind {
            NodeKind::PreCondition(parts) => {
                assert_eq!(parts.len(), 2);
                match &parts[0].kind {
                    NodeKind::Logic(LogicOp::Ge, low, var) => {
                        assert_eq!(low.kind, NodeKind::Integer(-5));
                        assert_eq!(var.variable_name(), Some("x"));
                    }
                    other => panic!("expected (>=, -5, x), found {:?}", other),
                }
                match &parts[1].kind {
                    NodeKind::Logic(LogicOp::Le, high, var) => {
                        assert_eq!(high.kind, NodeKind::Integer(5));
                        assert_eq!(var.variable_name(), Some("x"));
                    }
                    other => panic!("expected (<=, 5, x), found {:?}", other),
                }
            }
            other => panic!("expected a pre-condition, found {:?}", other),
        }
    }

    #[test]
    fn test_postcondition_single_comparison() {
        let items = root_items("int x; x = 10; /*!npost x == 10*/");
        match &items[2].kind {
            NodeKind::PostCondition(parts) => {
                assert_eq!(parts.len(), 1);
                assert!(matches!(parts[0].kind, NodeKind::Logic(LogicOp::Eq, _, _)));
            }
            other => panic!("expected a post-condition, found {:?}", other),
        }
    }

    #[test]
    fn test_postcondition_range_desugars() {
        let items = root_items("int x; x = 1; /*!npost -100 <= x <= 104*/");
        match &items[2].kind {
            NodeKind::PostCondition(parts) => {
                assert_eq!(parts.len(), 2);
                match &parts[0].kind {
                    NodeKind::Logic(LogicOp::Le, low, var) => {
                        assert_eq!(low.kind, NodeKind::Integer(-100));
                        assert_eq!(var.variable_name(), Some("x"));
                    }
                    other => panic!("expected (<=, -100, x), found {:?}", other),
                }
                match &parts[1].kind {
                    NodeKind::Logic(LogicOp::Le, var, high) => {
                        assert_eq!(var.variable_name(), Some("x"));
                        assert_eq!(high.kind, NodeKind::Integer(104));
                    }
                    other => panic!("expected (<=, x, 104), found {:?}", other),
                }
            }
            other => panic!("expected a post-condition, found {:?}", other),
        }
    }

    #[test]
    fn test_comments_are_skipped() {
        let items = root_items("// leading\nint x; /* inline\nspanning */ x = 3;");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse("int x;\nx = $;").unwrap_err();
        assert!(err.starts_with("line 2:"), "unexpected message: {}", err);

        let err = parse("int x;\nx = 3").unwrap_err();
        assert!(err.contains("expected `;`"), "unexpected message: {}", err);

        let err = parse("/* never closed").unwrap_err();
        assert!(err.contains("unterminated comment"), "unexpected message: {}", err);

        let err = parse("/*!npost x == 1").unwrap_err();
        assert!(err.contains("unterminated annotation"), "unexpected message: {}", err);
    }
}
