mod common;

mod report;
