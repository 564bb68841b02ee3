//! Server-rendered HTML for the public pages.

mod detail;
mod home;
mod layout;
mod listings;

pub(crate) use detail::{detail_page, CalculatorState};
pub(crate) use home::{home_page, UNSEARCHABLE_REGION};
pub(crate) use layout::failure_page;
pub(crate) use listings::listings_page;
