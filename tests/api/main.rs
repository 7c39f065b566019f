mod helpers;
mod login;
mod password_reset;
mod users;
mod verify_email;
