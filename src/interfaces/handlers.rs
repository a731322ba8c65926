pub mod auth;
pub mod certifications;
pub mod contact;
pub mod dashboard;
pub mod experience;
pub mod home;
pub mod media;
pub mod posts;
pub mod projects;
pub mod system;
pub mod testimonials;
