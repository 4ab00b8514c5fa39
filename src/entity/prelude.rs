//! 预导入模块，方便使用

pub use super::companies::{
    ActiveModel as CompanyActiveModel, Entity as Companies, Model as CompanyModel,
};
pub use super::contacts::{
    ActiveModel as ContactActiveModel, Entity as Contacts, Model as ContactModel,
};
pub use super::documents::{
    ActiveModel as DocumentActiveModel, Entity as Documents, Model as DocumentModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::internships::{
    ActiveModel as InternshipActiveModel, Entity as Internships, Model as InternshipModel,
};
pub use super::modules::{
    ActiveModel as ModuleActiveModel, Entity as Modules, Model as ModuleModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::tutors::{ActiveModel as TutorActiveModel, Entity as Tutors, Model as TutorModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::workshops::{
    ActiveModel as WorkshopActiveModel, Entity as Workshops, Model as WorkshopModel,
};
