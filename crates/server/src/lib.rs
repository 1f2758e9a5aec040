pub mod config;

pub mod db;

pub mod error_convert;

pub mod health;

pub mod openapi;

pub mod rest;

pub mod telemetry;

// Identity and deployment scoping
pub mod identity;

pub mod tenant;

// Case storage and workflows
pub mod store;

pub mod intake;

pub mod lifecycle;

pub mod dashboard;

// Outbound integrations
pub mod notify;

pub mod summarize;
