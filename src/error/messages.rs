//! User-facing message texts.

// Errors
pub const ERROR_SAVE_AUTH_TOKEN: &str =
    "Error saving authentication token.\nTry restarting the app.";
pub const ERROR_MUST_SELECT_IMAGE: &str = "Text is required if no file is selected";
pub const GENERIC_AUTH_ERROR: &str = "Error";
pub const UNAUTHORIZED_ERROR: &str = "You are not allowed to do this action";
pub const SERVER_ERROR: &str = "Server Error. Try again later.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ERROR_EMAIL_IN_USE: &str = "The given email address is already in use.";
pub const ERROR_USERNAME_IN_USE: &str = "The given username is already in use.";
pub const ERROR_UNABLE_TO_RETRIEVE_ACCOUNT_DETAILS: &str =
    "Unable to retrieve account details. Try logging out.";
pub const ERROR_POST_UNABLE_TO_RETRIEVE: &str =
    "Unable to retrieve the post. Maybe it got deleted";
pub const ERROR_NO_PREVIOUS_AUTH_USER: &str =
    "No previously authenticated user. This error can be ignored.";
pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const ERROR_PROFILE_UNABLE_TO_RETRIEVE: &str =
    "Unable to retrieve the profile. Try reselecting it from the list.";

// Successes
pub const RESPONSE_CHECK_PREVIOUS_AUTH_USER_DONE: &str =
    "Done checking for previously authenticated user.";
pub const SUCCESS_POST_CREATED: &str = "Successfully created";
pub const SUCCESS_POST_DELETED: &str = "Successfully deleted";
pub const SUCCESS_FOLLOW_TOGGLED: &str = "follow toggled";
pub const SUCCESS_ACCOUNT_UPDATED: &str = "Account update success";
pub const SUCCESS_LOGOUT: &str = "Logout success.";

// Confirmations
pub const CONFIRM_DELETE_POST: &str = "Are you sure you want to delete this post?";
pub const CONFIRM_LOGOUT: &str = "Are you sure you want to logout?";
