pub mod member;
pub mod study;

pub use member::Entity as MemberEntity;
pub use study::Entity as StudyEntity;
