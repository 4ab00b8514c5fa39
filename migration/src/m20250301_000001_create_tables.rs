use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Phone).string().null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建工坊（专业）表
        manager
            .create_table(
                Table::create()
                    .table(Workshops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workshops::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Workshops::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Workshops::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Workshops::Description).text().null())
                    .col(ColumnDef::new(Workshops::Status).string().not_null())
                    .col(
                        ColumnDef::new(Workshops::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Workshops::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建企业表
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::UserId).big_integer().null())
                    .col(
                        ColumnDef::new(Companies::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Companies::TaxId).string().null())
                    .col(ColumnDef::new(Companies::Sector).string().null())
                    .col(ColumnDef::new(Companies::Address).text().null())
                    .col(ColumnDef::new(Companies::Email).string().null())
                    .col(ColumnDef::new(Companies::Phone).string().null().unique_key())
                    .col(ColumnDef::new(Companies::Status).string().not_null())
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Companies::Table, Companies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建企业联系人表
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::CompanyId).big_integer().not_null())
                    .col(ColumnDef::new(Contacts::Name).string().not_null())
                    .col(ColumnDef::new(Contacts::Position).string().null())
                    .col(ColumnDef::new(Contacts::Email).string().null())
                    .col(ColumnDef::new(Contacts::Phone).string().null())
                    .col(ColumnDef::new(Contacts::Status).string().not_null())
                    .col(ColumnDef::new(Contacts::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Contacts::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contacts::Table, Contacts::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::WorkshopId).big_integer().not_null())
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Students::DocumentId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Phone).string().null().unique_key())
                    .col(ColumnDef::new(Students::Status).string().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::WorkshopId)
                            .to(Workshops::Table, Workshops::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建导师表
        manager
            .create_table(
                Table::create()
                    .table(Tutors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tutors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tutors::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tutors::WorkshopId).big_integer().not_null())
                    .col(ColumnDef::new(Tutors::FirstName).string().not_null())
                    .col(ColumnDef::new(Tutors::LastName).string().not_null())
                    .col(ColumnDef::new(Tutors::Phone).string().null().unique_key())
                    .col(ColumnDef::new(Tutors::Status).string().not_null())
                    .col(ColumnDef::new(Tutors::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Tutors::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tutors::Table, Tutors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tutors::Table, Tutors::WorkshopId)
                            .to(Workshops::Table, Workshops::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建实习表
        manager
            .create_table(
                Table::create()
                    .table(Internships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Internships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Internships::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Internships::CompanyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Internships::WorkshopId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Internships::TutorId).big_integer().null())
                    .col(ColumnDef::new(Internships::ContactId).big_integer().null())
                    .col(ColumnDef::new(Internships::Position).string().null())
                    .col(
                        ColumnDef::new(Internships::StartDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Internships::EndDate).big_integer().not_null())
                    .col(
                        ColumnDef::new(Internships::HoursRequired)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Internships::Status).string().not_null())
                    .col(ColumnDef::new(Internships::ClosedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Internships::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Internships::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Internships::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Internships::Table, Internships::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Internships::Table, Internships::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Internships::Table, Internships::WorkshopId)
                            .to(Workshops::Table, Workshops::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Internships::Table, Internships::TutorId)
                            .to(Tutors::Table, Tutors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Internships::Table, Internships::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评价表（每个评价人对每个实习一份量规）
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::InternshipId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::Ra1).double().not_null())
                    .col(ColumnDef::new(Evaluations::Ra2).double().not_null())
                    .col(ColumnDef::new(Evaluations::Ra3).double().not_null())
                    .col(ColumnDef::new(Evaluations::Ra4).double().not_null())
                    .col(ColumnDef::new(Evaluations::Ra5).double().not_null())
                    .col(ColumnDef::new(Evaluations::Ra6).double().not_null())
                    .col(ColumnDef::new(Evaluations::Ra7).double().not_null())
                    .col(ColumnDef::new(Evaluations::Comment).text().null())
                    .col(
                        ColumnDef::new(Evaluations::EvaluatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::InternshipId)
                            .to(Internships::Table, Internships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::EvaluatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩表（每个实习一条）
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Grades::InternshipId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Grades::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::Ra1).double().not_null())
                    .col(ColumnDef::new(Grades::Ra2).double().not_null())
                    .col(ColumnDef::new(Grades::Ra3).double().not_null())
                    .col(ColumnDef::new(Grades::Ra4).double().not_null())
                    .col(ColumnDef::new(Grades::Ra5).double().not_null())
                    .col(ColumnDef::new(Grades::Ra6).double().not_null())
                    .col(ColumnDef::new(Grades::Ra7).double().not_null())
                    .col(ColumnDef::new(Grades::Average).double().not_null())
                    .col(ColumnDef::new(Grades::Result).string().not_null())
                    .col(
                        ColumnDef::new(Grades::EvaluationCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Grades::GradedBy).big_integer().not_null())
                    .col(ColumnDef::new(Grades::GradedAt).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::InternshipId)
                            .to(Internships::Table, Internships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建实习模块表（每个学生每个工坊一条）
        manager
            .create_table(
                Table::create()
                    .table(Modules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Modules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Modules::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Modules::WorkshopId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Modules::InternshipId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Modules::GradeId).big_integer().not_null())
                    .col(ColumnDef::new(Modules::Average).double().not_null())
                    .col(ColumnDef::new(Modules::Result).string().not_null())
                    .col(ColumnDef::new(Modules::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Modules::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Modules::Table, Modules::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Modules::Table, Modules::WorkshopId)
                            .to(Workshops::Table, Workshops::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Modules::Table, Modules::InternshipId)
                            .to(Internships::Table, Internships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Modules::Table, Modules::GradeId)
                            .to(Grades::Table, Grades::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建文档表
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Documents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Documents::DownloadToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Documents::OriginalName).string().not_null())
                    .col(ColumnDef::new(Documents::StoredName).string().not_null())
                    .col(ColumnDef::new(Documents::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Documents::FileType).string().not_null())
                    .col(ColumnDef::new(Documents::DocumentType).string().not_null())
                    .col(ColumnDef::new(Documents::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Documents::StudentId).big_integer().null())
                    .col(ColumnDef::new(Documents::InternshipId).big_integer().null())
                    .col(
                        ColumnDef::new(Documents::UploadedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Documents::Table, Documents::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Documents::Table, Documents::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Documents::Table, Documents::InternshipId)
                            .to(Internships::Table, Internships::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contacts_company_id")
                    .table(Contacts::Table)
                    .col(Contacts::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_workshop_id")
                    .table(Students::Table)
                    .col(Students::WorkshopId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_internships_student_id")
                    .table(Internships::Table)
                    .col(Internships::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_internships_company_id")
                    .table(Internships::Table)
                    .col(Internships::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_internships_status")
                    .table(Internships::Table)
                    .col(Internships::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_internship_evaluator")
                    .table(Evaluations::Table)
                    .col(Evaluations::InternshipId)
                    .col(Evaluations::EvaluatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_modules_student_workshop")
                    .table(Modules::Table)
                    .col(Modules::StudentId)
                    .col(Modules::WorkshopId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_documents_internship_id")
                    .table(Documents::Table)
                    .col(Documents::InternshipId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Modules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Internships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tutors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workshops::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    Phone,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Workshops {
    #[sea_orm(iden = "workshops")]
    Table,
    Id,
    Name,
    Code,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    #[sea_orm(iden = "companies")]
    Table,
    Id,
    UserId,
    Name,
    TaxId,
    Sector,
    Address,
    Email,
    Phone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    #[sea_orm(iden = "contacts")]
    Table,
    Id,
    CompanyId,
    Name,
    Position,
    Email,
    Phone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserId,
    WorkshopId,
    FirstName,
    LastName,
    DocumentId,
    Phone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tutors {
    #[sea_orm(iden = "tutors")]
    Table,
    Id,
    UserId,
    WorkshopId,
    FirstName,
    LastName,
    Phone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Internships {
    #[sea_orm(iden = "internships")]
    Table,
    Id,
    StudentId,
    CompanyId,
    WorkshopId,
    TutorId,
    ContactId,
    Position,
    StartDate,
    EndDate,
    HoursRequired,
    Status,
    ClosedAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    InternshipId,
    EvaluatorId,
    Ra1,
    Ra2,
    Ra3,
    Ra4,
    Ra5,
    Ra6,
    Ra7,
    Comment,
    EvaluatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    InternshipId,
    StudentId,
    Ra1,
    Ra2,
    Ra3,
    Ra4,
    Ra5,
    Ra6,
    Ra7,
    Average,
    Result,
    EvaluationCount,
    GradedBy,
    GradedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Modules {
    #[sea_orm(iden = "modules")]
    Table,
    Id,
    StudentId,
    WorkshopId,
    InternshipId,
    GradeId,
    Average,
    Result,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Documents {
    #[sea_orm(iden = "documents")]
    Table,
    Id,
    DownloadToken,
    OriginalName,
    StoredName,
    FileSize,
    FileType,
    DocumentType,
    OwnerId,
    StudentId,
    InternshipId,
    UploadedAt,
}
