pub mod certification;
pub mod contact;
pub mod dashboard;
pub mod envelope;
pub mod experience;
pub mod option_fields;
pub mod post;
pub mod project;
pub mod status;
pub mod testimonial;
pub mod token;
pub mod user;
pub mod validation;
