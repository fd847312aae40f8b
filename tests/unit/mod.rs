//! Unit test modules.

mod selectors_test;
mod template_parser_test;
