pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod errors;
pub mod form;
pub mod http;
pub mod logger;
pub mod navigation;
pub mod notification;
pub mod response;
pub mod schema;

pub use client::{SignupClient, SignupEndpoint};
pub use config::Config;
pub use controller::{FormState, SubmissionController, SubmissionState, SubmitOutcome};
pub use error::Error;
pub use errors::ValidationErrorMap;
pub use form::{Field, FormValues, SignupForm};
pub use navigation::{NavigationChannel, NavigationSender, Navigator};
pub use notification::{NotificationChannel, NotificationSender, Notifier};
pub use response::{ResponseBody, ResponsePayload};
pub use schema::{SignupFormSchema, Validator};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
