pub mod analyze;
pub mod history;
pub mod project;
pub mod util;
pub mod widgets;

pub use analyze::*;
pub use history::*;
pub use project::*;
pub use util::*;
pub use widgets::*;
