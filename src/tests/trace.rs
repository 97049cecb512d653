use super::*;

#[test]
fn engine_macros_accept_structured_fields() {
    trace!(subgoal = 2, view_atom = 1, "mcd_inconsistent_alignment");
    debug!(emitted = 3, branches = 7, "enumeration_finished");
    info!(views = 4, "program_loaded");
    warn!(view = "Missing", "preference_for_unknown_view");

    let _outer = info_span!("rewrite", cap = 10).entered();
    let _inner = debug_span!("enumerate_rewritings").entered();
}

#[test]
fn init_subscriber_can_be_called_twice() {
    init_subscriber();
    init_subscriber();
}
