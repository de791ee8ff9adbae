//! emberc-parse — a Pratt parser turning a token stream into an
//! [`emberc_ast::Program`] (spec §4.2).

mod error;
mod parser;
mod precedence;

pub use error::ParseError;
pub use parser::Parser;
pub use precedence::{precedence_of, Precedence};

#[cfg(test)]
mod tests {
    use super::*;
    use emberc_util::Handler;

    fn parse(source: &str) -> (emberc_ast::Program, Handler) {
        let mut handler = Handler::new();
        let program = Parser::new(source, &mut handler).parse_program();
        (program, handler)
    }

    fn assert_no_errors(handler: &Handler) {
        assert!(!handler.has_errors(), "unexpected parse errors: {:?}", handler.diagnostics());
    }

    #[test]
    fn let_statement_round_trips() {
        let (program, handler) = parse("let x = 5;");
        assert_no_errors(&handler);
        assert_eq!(program.to_string(), "let x = 5;");
    }

    #[test]
    fn return_statement_round_trips() {
        let (program, handler) = parse("return 10;");
        assert_no_errors(&handler);
        assert_eq!(program.to_string(), "return 10;");
    }

    #[test]
    fn operator_precedence_is_made_explicit_by_parenthesization() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))"),
        ];

        for (input, expected) in cases {
            let (program, handler) = parse(input);
            assert_no_errors(&handler);
            assert_eq!(program.to_string(), expected, "input: {input}");
        }
    }

    #[test]
    fn if_expression_round_trips() {
        let (program, handler) = parse("if (x < y) { x } else { y }");
        assert_no_errors(&handler);
        assert_eq!(program.to_string(), "if(x < y) xelse y");
    }

    #[test]
    fn function_literal_round_trips() {
        let (program, handler) = parse("fn(x, y) { x + y; }");
        assert_no_errors(&handler);
        assert_eq!(program.to_string(), "fn(x, y) (x + y)");
    }

    #[test]
    fn hash_literal_with_expression_values_parses() {
        let (program, handler) = parse(r#"{"one": 0 + 1, "two": 10 - 8, "three": 15 / 5}"#);
        assert_no_errors(&handler);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn missing_closing_paren_is_reported_as_an_error() {
        let (_program, handler) = parse("(1 + 2");
        assert!(handler.has_errors());
    }

    #[test]
    fn unknown_prefix_token_is_reported_as_an_error() {
        let (_program, handler) = parse(");");
        assert!(handler.has_errors());
    }
}
