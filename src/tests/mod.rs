//! Scenario tests that drive whole pages through their buses.
