pub mod invite_token;
pub mod validated_form;
pub mod validator;
