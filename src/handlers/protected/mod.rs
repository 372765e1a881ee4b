pub mod access;
pub mod auth;
pub mod dashboard;
pub mod flashcards;
pub mod homework;
pub mod quick_help;
pub mod quizzes;
pub mod resources;
pub mod solutions;
pub mod subscriptions;
