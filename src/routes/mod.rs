pub mod auth;

pub mod users;

pub mod workshops;

pub mod companies;

pub mod contacts;

pub mod students;

pub mod tutors;

pub mod internships;

pub mod grades;

pub mod modules;

pub mod documents;

pub mod reports;

pub use auth::configure_auth_routes;
pub use companies::configure_company_routes;
pub use contacts::configure_contact_routes;
pub use documents::configure_document_routes;
pub use grades::configure_grade_routes;
pub use internships::configure_internship_routes;
pub use modules::configure_module_routes;
pub use reports::configure_report_routes;
pub use students::configure_student_routes;
pub use tutors::configure_tutor_routes;
pub use users::configure_user_routes;
pub use workshops::configure_workshop_routes;
