pub mod certification;
pub mod contact;
pub mod experience;
pub mod post;
pub mod project;
pub mod sqlx_repo;
pub mod testimonial;
pub mod user;
