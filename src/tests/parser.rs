use super::*;
use crate::record::format_record;
use crate::record::Rank;
use crate::test_utils::setup;

// ========================================================================
// RULE PARSING TESTS
// ========================================================================

#[test]
fn parse_simple_rule() {
    let symbols = setup();
    let r = parse_rule(&symbols, "Q(x, y) :- p(x, z), q(z, y)").unwrap();
    assert_eq!(symbols.resolve(r.name()), Some("Q"));
    assert_eq!(r.head().len(), 2);
    assert_eq!(r.number_of_subgoals(), 2);
    assert_eq!(
        format_record(&r, &symbols).unwrap(),
        "Q(x, y) :- p(x, z), q(z, y)"
    );
}

#[test]
fn repeated_name_is_one_variable_within_a_rule() {
    let symbols = setup();
    let r = parse_rule(&symbols, "Q(x) :- p(x, x)").unwrap();
    let elems = r.subgoals()[0].elements();
    assert_eq!(elems[0], elems[1]);
    assert_eq!(elems[0], r.head()[0]);
}

#[test]
fn same_name_in_two_rules_is_two_variables() {
    let symbols = setup();
    let a = parse_rule(&symbols, "A(x) :- p(x)").unwrap();
    let b = parse_rule(&symbols, "B(x) :- p(x)").unwrap();
    assert_ne!(a.head()[0], b.head()[0]);
}

#[test]
fn numbers_and_strings_are_constants() {
    let symbols = setup();
    let r = parse_rule(&symbols, "V(y) :- q(1, -2.5, \"a b\", y)").unwrap();
    let elems = r.subgoals()[0].elements();
    assert!(elems[0].is_const());
    assert!(elems[1].is_const());
    assert!(elems[2].is_const());
    assert!(elems[3].is_var());
    assert_eq!(
        format_record(&r, &symbols).unwrap(),
        "V(y) :- q(1, -2.5, \"a b\", y)"
    );
}

#[test]
fn equal_literals_intern_to_same_constant() {
    let symbols = setup();
    let a = parse_rule(&symbols, "A(x) :- p(x, 7)").unwrap();
    let b = parse_rule(&symbols, "B(y) :- p(y, 7)").unwrap();
    assert_eq!(a.subgoals()[0].elements()[1], b.subgoals()[0].elements()[1]);
}

#[test]
fn parse_inline_rank() {
    let symbols = setup();
    let r = parse_rule(&symbols, "V(x) :- p(x) @ 3.5").unwrap();
    assert_eq!(r.rank(), Rank::new(3.5));
}

#[test]
fn rule_without_rank_gets_default() {
    let symbols = setup();
    let r = parse_rule(&symbols, "V(x) :- p(x)").unwrap();
    assert_eq!(r.rank(), Rank::default());
}

#[test]
fn nullary_atoms_parse() {
    let symbols = setup();
    let r = parse_rule(&symbols, "Q() :- flag()").unwrap();
    assert!(r.head().is_empty());
    assert_eq!(r.subgoals()[0].arity(), 0);
}

#[test]
fn parse_rule_missing_arrow_fails() {
    let symbols = setup();
    let err = parse_rule(&symbols, "Q(x) p(x)").unwrap_err();
    assert!(err.message.contains(":-"), "got: {}", err);
}

#[test]
fn parse_rule_unclosed_paren_fails() {
    let symbols = setup();
    assert!(parse_rule(&symbols, "Q(x :- p(x)").is_err());
    assert!(parse_rule(&symbols, "Q(x) :- p(x").is_err());
}

#[test]
fn parse_rule_trailing_garbage_fails() {
    let symbols = setup();
    let err = parse_rule(&symbols, "Q(x) :- p(x) extra").unwrap_err();
    assert_eq!(err.position, 13);
}

#[test]
fn parse_rule_empty_body_fails() {
    let symbols = setup();
    assert!(parse_rule(&symbols, "Q(x) :- ").is_err());
}

#[test]
fn unterminated_string_fails() {
    let symbols = setup();
    let err = parse_rule(&symbols, "Q(x) :- p(x, \"open)").unwrap_err();
    assert!(err.message.contains("Unterminated"));
}

// ========================================================================
// PROGRAM PARSING TESTS
// ========================================================================

#[test]
fn parse_program_with_query_and_views() {
    let symbols = setup();
    let program = parse_program(
        &symbols,
        "% views over p and q\n\
         ?- Q(x, y) :- p(x, z), q(z, y).\n\
         V1(x) :- p(x, 1).\n\
         V2(y) :- q(2, y) @ 3.5.  % ranked\n",
    )
    .unwrap();

    let q = program.query.unwrap();
    assert_eq!(symbols.resolve(q.name()), Some("Q"));
    assert_eq!(program.views.len(), 2);
    assert_eq!(program.views[0].rank(), Rank::default());
    assert_eq!(program.views[1].rank(), Rank::new(3.5));
}

#[test]
fn query_may_appear_after_views() {
    let symbols = setup();
    let program = parse_program(&symbols, "V(x) :- p(x).\n?- Q(x) :- p(x).").unwrap();
    assert!(program.query.is_some());
    assert_eq!(program.views.len(), 1);
}

#[test]
fn program_without_query_has_none() {
    let symbols = setup();
    let program = parse_program(&symbols, "V(x) :- p(x).").unwrap();
    assert!(program.query.is_none());
}

#[test]
fn two_queries_fail() {
    let symbols = setup();
    let err = parse_program(&symbols, "?- Q(x) :- p(x).\n?- R(x) :- p(x).").unwrap_err();
    assert!(err.message.contains("more than one query"));
}

#[test]
fn ranked_query_fails() {
    let symbols = setup();
    assert!(parse_program(&symbols, "?- Q(x) :- p(x) @ 2.").is_err());
}

#[test]
fn query_ranked_at_the_default_value_fails() {
    let symbols = setup();
    let input = "?- Q(x) :- p(x) @ 0.";
    let err = parse_program(&symbols, input).unwrap_err();
    assert_eq!(err.message, "A query cannot carry a rank");
    assert_eq!(err.position, input.find('@').unwrap());
}

#[test]
fn view_ranked_at_the_default_value_parses() {
    let symbols = setup();
    let program = parse_program(&symbols, "V(x) :- p(x) @ 0.").unwrap();
    assert_eq!(program.views[0].rank(), Rank::default());
}

#[test]
fn missing_period_fails() {
    let symbols = setup();
    assert!(parse_program(&symbols, "V(x) :- p(x)").is_err());
}

#[test]
fn empty_program_is_empty() {
    let symbols = setup();
    let program = parse_program(&symbols, "  % nothing here\n").unwrap();
    assert!(program.query.is_none());
    assert!(program.views.is_empty());
}

#[test]
fn integer_rank_before_period() {
    let symbols = setup();
    let program = parse_program(&symbols, "V(x) :- p(x) @ 3.").unwrap();
    assert_eq!(program.views[0].rank(), Rank::new(3.0));
}

#[test]
fn parse_error_size_reasonable() {
    assert!(std::mem::size_of::<ParseError>() <= 64);
}
