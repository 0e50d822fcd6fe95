//! Grammar productions, one module per division.
//!
//! Every production is a free function taking the parser; composite nodes
//! are opened with `start_node` and closed with `finish_node`, so the
//! functions read like the grammar itself.

pub(crate) mod data;
pub(crate) mod environment;
pub(crate) mod procedure;
pub(crate) mod program;

use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

/// Tokens that can start an operand (a literal, figurative constant, or
/// data-name reference).
pub(crate) fn at_operand_start(p: &Parser) -> bool {
    let kind = p.current_kind();
    kind == SyntaxKind::WORD
        || kind.is_literal_token()
        || kind.is_figurative()
        || kind == SyntaxKind::ALL_KW
}

/// `name [(OF|IN) name]* [(subscripts)]` - a possibly qualified data or
/// procedure reference.
pub(crate) fn name_ref(p: &mut Parser) {
    p.skip_trivia();
    p.start_node(SyntaxKind::NAME_REF);
    if !p.eat(SyntaxKind::WORD) && !p.eat(SyntaxKind::INTEGER) {
        p.error("expected a name");
        p.finish_node();
        return;
    }
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::OF_KW) || p.at(SyntaxKind::IN_KW) {
            p.start_node(SyntaxKind::QUALIFIER);
            p.bump();
            if !p.eat(SyntaxKind::WORD) {
                p.error("expected a qualifying name after OF/IN");
            }
            p.finish_node();
        } else {
            break;
        }
    }
    p.skip_trivia();
    if p.at(SyntaxKind::LPAREN) {
        p.start_node(SyntaxKind::SUBSCRIPT);
        p.bump();
        while !p.at_eof() && !p.at(SyntaxKind::RPAREN) {
            p.skip_trivia();
            if p.at(SyntaxKind::RPAREN) {
                break;
            }
            p.bump_any();
        }
        p.expect(SyntaxKind::RPAREN);
        p.finish_node();
    }
    p.finish_node();
}

/// A literal operand: string, number, or figurative constant
/// (`ALL literal` included).
pub(crate) fn literal(p: &mut Parser) {
    p.skip_trivia();
    p.start_node(SyntaxKind::LITERAL);
    if p.at(SyntaxKind::ALL_KW) {
        p.bump();
        p.skip_trivia();
    }
    let kind = p.current_kind();
    if kind.is_literal_token() || kind.is_figurative() || kind == SyntaxKind::MINUS {
        // Signed numeric literals keep their sign token.
        if kind == SyntaxKind::MINUS {
            p.bump();
            p.skip_trivia();
        }
        p.bump();
    } else {
        p.error("expected a literal");
    }
    p.finish_node();
}

/// An operand: literal or name reference.
pub(crate) fn operand(p: &mut Parser) {
    p.skip_trivia();
    let kind = p.current_kind();
    if kind == SyntaxKind::WORD {
        name_ref(p);
    } else {
        literal(p);
    }
}

/// Division-start keywords: used as recovery anchors everywhere.
pub(crate) const DIVISION_STARTS: &[SyntaxKind] = &[
    SyntaxKind::IDENTIFICATION_KW,
    SyntaxKind::ID_KW,
    SyntaxKind::ENVIRONMENT_KW,
    SyntaxKind::DATA_KW,
    SyntaxKind::PROCEDURE_KW,
    SyntaxKind::END_KW,
];
