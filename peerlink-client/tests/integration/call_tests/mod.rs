pub mod test_callee_flow;
pub mod test_end_call;
