//! UI drawing module
//!
//! - `components`: header, editable fields, error banner, footer
//! - `modals`: body and org id editors
//! - `panels`: request line, endpoint field, tabbed response area
//! - `tabs`: structured, raw and request views
//! - `styling`: color schemes and style constants

mod components;
mod modals;
mod panels;
pub mod styling;
mod tabs;

pub use components::{render_error_banner, render_footer, render_header};
pub use modals::render_active_modal;
pub use panels::{
    endpoint_row_visible, render_endpoint_panel, render_request_panel, render_response_panel,
};
