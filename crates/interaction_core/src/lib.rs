//! Interaction state machine for a brochure site: navigation menu, contact
//! form validation and submission, portfolio filter, scroll spy, count-up
//! stats and the scroll-to-top control, driven through a DOM port.

pub mod controller;
pub mod count_up;
pub mod discovery;
pub mod dom;
pub mod events;
pub mod filter;
pub mod form;
pub mod handles;
pub mod header_nav;
pub mod nav;
pub mod scroll_spy;
pub mod scroll_top;
pub mod timers;
pub mod transport;
pub mod validation;

pub use controller::{InteractionState, PageController};
pub use dom::{Dom, DomQuery, MemoryDom, ScrollBehavior};
pub use events::{EventOutcome, PageEvent, Subscription};
pub use handles::PageHandles;
pub use timers::{ScheduledAction, TimerId, TimerQueue};
pub use transport::{HttpSubmissionTransport, SubmissionTransport, SubmitError};
pub use validation::{validate, FieldValidationResult, FormSnapshot, ValidationOutcome};
