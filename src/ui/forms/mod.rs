//! Form rendering module
//!
//! This module contains UI components for rendering forms:
//! - `field_renderer`: Field rendering utilities
//! - `login_form`: Sign-in form
//! - `trial_form`: Free trial booking form

mod field_renderer;
mod login_form;
mod trial_form;

pub use login_form::draw_login;
pub use trial_form::draw_trial;
