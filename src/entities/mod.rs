//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod admin;
pub mod admin_session;
pub mod column_post;
pub mod customer;
pub mod diagnosis_request;
pub mod inquiry;
pub mod order;
pub mod partner;
pub mod partner_application;
pub mod partner_application_prefecture;
pub mod partner_detail;
pub mod partner_prefecture;
pub mod quotation;
pub mod status;

// Re-export specific types to avoid conflicts
pub use admin::{Column as AdminColumn, Entity as Admin, Model as AdminModel};
pub use admin_session::{
    Column as AdminSessionColumn, Entity as AdminSession, Model as AdminSessionModel,
};
pub use column_post::{Column as ColumnPostColumn, Entity as ColumnPost, Model as ColumnPostModel};
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use diagnosis_request::{
    Column as DiagnosisRequestColumn, Entity as DiagnosisRequest, Model as DiagnosisRequestModel,
};
pub use inquiry::{Column as InquiryColumn, Entity as Inquiry, Model as InquiryModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use partner::{Column as PartnerColumn, Entity as Partner, Model as PartnerModel};
pub use partner_application::{
    Column as PartnerApplicationColumn, Entity as PartnerApplication,
    Model as PartnerApplicationModel,
};
pub use partner_application_prefecture::{
    Column as PartnerApplicationPrefectureColumn, Entity as PartnerApplicationPrefecture,
};
pub use partner_detail::{
    Column as PartnerDetailColumn, Entity as PartnerDetail, Model as PartnerDetailModel,
};
pub use partner_prefecture::{Column as PartnerPrefectureColumn, Entity as PartnerPrefecture};
pub use quotation::{Column as QuotationColumn, Entity as Quotation, Model as QuotationModel};
