//! Field validators used by the request DTOs

use validator::ValidationError;

pub const PERSON_NAME_MESSAGE: &str =
    "The name should contain two capital words with name and surname and space between them";

pub const BOOK_TITLE_MESSAGE: &str =
    "The book title should start with a capital letter and have 3 symbols minimum length";

const BOOK_TITLE_MIN_LENGTH: usize = 3;

/// A person name is a first name and a surname, both capitalised,
/// separated by exactly one whitespace character.
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    let whitespaces = name.chars().filter(|c| c.is_whitespace()).count();
    let capitalised = name.split(' ').all(starts_with_uppercase);

    if whitespaces == 1 && capitalised {
        Ok(())
    } else {
        Err(error("person_name", PERSON_NAME_MESSAGE))
    }
}

pub fn validate_book_title(title: &str) -> Result<(), ValidationError> {
    if title.chars().count() >= BOOK_TITLE_MIN_LENGTH && starts_with_uppercase(title) {
        Ok(())
    } else {
        Err(error("book_title", BOOK_TITLE_MESSAGE))
    }
}

fn starts_with_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
