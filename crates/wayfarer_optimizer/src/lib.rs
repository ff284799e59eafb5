pub mod itinerary;
pub mod optimizer;
pub mod optimizer_params;
pub mod randomized_two_opt;
pub mod retry;
pub mod solver;

#[cfg(test)]
pub(crate) mod test_utils;
