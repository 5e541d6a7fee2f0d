mod policy_tests;
mod milestone_tests;
mod availability_tests;
mod api_tests;
