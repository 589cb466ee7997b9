pub mod fake_qbit;
