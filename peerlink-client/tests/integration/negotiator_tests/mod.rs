pub mod test_negotiator_lifecycle;
