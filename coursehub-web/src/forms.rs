//! The client's forms, one table entry each.
//!
//! Every form is a [`SubmissionController`] built from three pieces: a values
//! type, a [`ValidationSchema`] and an [`Operation`] describing the request.

use reqwest::Method;
use serde_json::Value;
use shared::config::ClientConfig;
use shared::models::{
    CourseRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
};

use crate::routes::AppRoute;
use crate::submission::{Operation, SubmissionController};
use crate::validation::{FieldInput, FieldRef, FormValues, Rule, ValidationSchema};

const INVALID_EMAIL: &str = "Invalid email address";
const EMAIL_REQUIRED: &str = "Email is required";

fn email_rules() -> Vec<Rule> {
    vec![Rule::required(EMAIL_REQUIRED), Rule::email(INVALID_EMAIL)]
}

fn set_text(slot: &mut String, value: FieldInput) -> bool {
    match value {
        FieldInput::Text(text) => {
            *slot = text;
            true
        }
        _ => false,
    }
}

fn set_flag(slot: &mut bool, value: FieldInput) -> bool {
    match value {
        FieldInput::Flag(flag) => {
            *slot = flag;
            true
        }
        _ => false,
    }
}

fn to_body<B: serde::Serialize>(body: &B) -> Option<Value> {
    serde_json::to_value(body).ok()
}

/// Sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInValues {
    /// Account email.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

impl FormValues for SignInValues {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "email" => Some(FieldRef::Text(&self.email)),
            "password" => Some(FieldRef::Text(&self.password)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldInput) -> bool {
        match name {
            "email" => set_text(&mut self.email, value),
            "password" => set_text(&mut self.password, value),
            _ => false,
        }
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpValues {
    /// Requested username.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

impl FormValues for SignUpValues {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "username" => Some(FieldRef::Text(&self.username)),
            "email" => Some(FieldRef::Text(&self.email)),
            "password" => Some(FieldRef::Text(&self.password)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldInput) -> bool {
        match name {
            "username" => set_text(&mut self.username, value),
            "email" => set_text(&mut self.email, value),
            "password" => set_text(&mut self.password, value),
            _ => false,
        }
    }
}

/// Forgot-password form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordValues {
    /// Account email.
    pub email: String,
}

impl FormValues for ForgotPasswordValues {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        (name == "email").then_some(FieldRef::Text(&self.email))
    }

    fn set_field(&mut self, name: &str, value: FieldInput) -> bool {
        name == "email" && set_text(&mut self.email, value)
    }
}

/// Reset-password form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordValues {
    /// Password as typed.
    pub password: String,
    /// Repeat of the new password.
    pub password_confirmation: String,
}

impl FormValues for ResetPasswordValues {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "password" => Some(FieldRef::Text(&self.password)),
            "passwordConfirmation" => Some(FieldRef::Text(&self.password_confirmation)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldInput) -> bool {
        match name {
            "password" => set_text(&mut self.password, value),
            "passwordConfirmation" => set_text(&mut self.password_confirmation, value),
            _ => false,
        }
    }
}

/// The verify-email page has no inputs; the token travels in the path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyEmailValues;

impl FormValues for VerifyEmailValues {
    fn field(&self, _name: &str) -> Option<FieldRef<'_>> {
        None
    }

    fn set_field(&mut self, _name: &str, _value: FieldInput) -> bool {
        false
    }
}

/// Course authoring form. Numbers are kept as typed and parsed on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseValues {
    /// Course title.
    pub title: String,
    /// Course description.
    pub description: String,
    /// Price as typed.
    pub price: String,
    /// Optional estimated price as typed.
    pub estimation_price: String,
    /// Duration in hours as typed.
    pub duration: String,
    /// Selected category tags.
    pub category: Vec<String>,
    /// Free course toggle.
    pub is_free: bool,
    /// Publish toggle.
    pub is_published: bool,
}

impl CourseValues {
    /// Prefills the edit form from an existing course.
    #[must_use]
    pub fn from_request(course: &CourseRequest) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            price: course.price.to_string(),
            estimation_price: if course.estimation_price > 0.0 {
                course.estimation_price.to_string()
            } else {
                String::new()
            },
            duration: course.duration.to_string(),
            category: course.category.clone(),
            is_free: course.is_free,
            is_published: course.is_published,
        }
    }

    /// The request body. Blank or unparsable numbers become zero; the schema
    /// rejects them before this is called.
    #[must_use]
    pub fn to_request(&self) -> CourseRequest {
        let number = |text: &str| text.trim().parse::<f64>().unwrap_or(0.0);
        CourseRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: number(&self.price),
            estimation_price: number(&self.estimation_price),
            duration: number(&self.duration),
            category: self.category.clone(),
            is_free: self.is_free,
            is_published: self.is_published,
        }
    }
}

impl FormValues for CourseValues {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "title" => Some(FieldRef::Text(&self.title)),
            "description" => Some(FieldRef::Text(&self.description)),
            "price" => Some(FieldRef::Text(&self.price)),
            "estimationPrice" => Some(FieldRef::Text(&self.estimation_price)),
            "duration" => Some(FieldRef::Text(&self.duration)),
            "category" => Some(FieldRef::List(&self.category)),
            "isFree" => Some(FieldRef::Flag(self.is_free)),
            "isPublished" => Some(FieldRef::Flag(self.is_published)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldInput) -> bool {
        match (name, value) {
            ("title", value) => set_text(&mut self.title, value),
            ("description", value) => set_text(&mut self.description, value),
            ("price", value) => set_text(&mut self.price, value),
            ("estimationPrice", value) => set_text(&mut self.estimation_price, value),
            ("duration", value) => set_text(&mut self.duration, value),
            ("category", FieldInput::List(items)) => {
                self.category = items;
                true
            }
            ("isFree", value) => set_flag(&mut self.is_free, value),
            ("isPublished", value) => set_flag(&mut self.is_published, value),
            _ => false,
        }
    }
}

/// Builds the client's forms from configuration.
#[derive(Debug, Clone)]
pub struct FormCatalog {
    post_login: AppRoute,
    categories: Vec<String>,
}

impl FormCatalog {
    /// A catalogue honouring `config`'s post-login path and category list.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            post_login: AppRoute::from_path_or_dashboard(&config.post_login_path),
            categories: config.course_categories.clone(),
        }
    }

    /// `POST auth/login`, expecting 200. Success becomes the session.
    #[must_use]
    pub fn sign_in(&self) -> SubmissionController<SignInValues> {
        let schema = ValidationSchema::new().field("email", email_rules()).field(
            "password",
            vec![
                Rule::required("Password is required"),
                Rule::min_length(8, "Password must be at least 8 characters"),
            ],
        );
        let operation = Operation::new(
            "sign-in",
            Method::POST,
            "auth/login",
            200,
            self.post_login.clone(),
        )
        .establishes_session()
        .with_body(|values: &SignInValues| {
            to_body(&LoginRequest {
                email: values.email.trim().to_lowercase(),
                password: values.password.clone(),
            })
        });

        SubmissionController::new(SignInValues::default(), schema, operation)
    }

    /// `POST auth/signup`, expecting 201, then the sign-in page.
    #[must_use]
    pub fn sign_up(&self) -> SubmissionController<SignUpValues> {
        let schema = ValidationSchema::new()
            .field(
                "username",
                vec![
                    Rule::required("Username is required"),
                    Rule::min_length(3, "Username must be at least 3 characters"),
                    Rule::max_length(20, "Username must be at most 20 characters"),
                    Rule::pattern(
                        "[a-zA-Z0-9_]*",
                        "Username must contain only letters, numbers, and underscores",
                    ),
                ],
            )
            .field("email", email_rules())
            .field(
                "password",
                vec![
                    Rule::required("Password is required"),
                    Rule::password(
                        8,
                        "Password must be at least 8 characters and contain at least one \
                         lowercase letter, one uppercase letter, one number, and one symbol",
                    ),
                ],
            );
        let operation = Operation::new(
            "sign-up",
            Method::POST,
            "auth/signup",
            201,
            AppRoute::SignIn,
        )
        .with_body(|values: &SignUpValues| {
            to_body(&SignupRequest {
                username: values.username.trim().to_lowercase(),
                email: values.email.trim().to_lowercase(),
                password: values.password.clone(),
            })
        });

        SubmissionController::new(SignUpValues::default(), schema, operation)
    }

    /// `POST auth/forgot-password`, expecting 200, then the sign-in page.
    #[must_use]
    pub fn forgot_password(&self) -> SubmissionController<ForgotPasswordValues> {
        let schema = ValidationSchema::new().field("email", email_rules());
        let operation = Operation::new(
            "forgot-password",
            Method::POST,
            "auth/forgot-password",
            200,
            AppRoute::SignIn,
        )
        .with_body(|values: &ForgotPasswordValues| {
            to_body(&ForgotPasswordRequest {
                email: values.email.trim().to_lowercase(),
            })
        });

        SubmissionController::new(ForgotPasswordValues::default(), schema, operation)
    }

    /// `POST auth/resetpassword` with the emailed `token`, expecting 200.
    #[must_use]
    pub fn reset_password(&self, token: &str) -> SubmissionController<ResetPasswordValues> {
        let schema = ValidationSchema::new()
            .field(
                "password",
                vec![
                    Rule::required("New Password is required"),
                    Rule::password(
                        8,
                        "New Password must be at least 8 characters and contain at least one \
                         lowercase letter, one uppercase letter, one number, and one symbol",
                    ),
                ],
            )
            .field(
                "passwordConfirmation",
                vec![
                    Rule::required("Confirm Password is required"),
                    Rule::min_length(8, "Confirm Password must be at least 8 characters"),
                ],
            )
            .must_match("passwordConfirmation", "password", "Passwords do not match");

        let token = token.to_string();
        let operation = Operation::new(
            "reset-password",
            Method::POST,
            "auth/resetpassword",
            200,
            AppRoute::SignIn,
        )
        .with_body(move |values: &ResetPasswordValues| {
            to_body(&ResetPasswordRequest {
                new_password: values.password.clone(),
                token: token.clone(),
            })
        });

        SubmissionController::new(ResetPasswordValues::default(), schema, operation)
    }

    /// `GET auth/verify-email/{token}`, expecting 200. The page submits it
    /// as soon as it mounts.
    #[must_use]
    pub fn verify_email(&self, token: &str) -> SubmissionController<VerifyEmailValues> {
        let operation = Operation::new(
            "verify-email",
            Method::GET,
            format!("auth/verify-email/{token}"),
            200,
            AppRoute::SignIn,
        );

        SubmissionController::new(VerifyEmailValues, ValidationSchema::new(), operation)
    }

    fn course_schema(&self) -> ValidationSchema {
        ValidationSchema::new()
            .field("title", vec![Rule::required("Title is required")])
            .field("description", vec![Rule::required("Description is required")])
            .field(
                "price",
                vec![
                    Rule::required("Price is required"),
                    Rule::positive_number("Price must be a number greater than 0"),
                ],
            )
            .field(
                "estimationPrice",
                vec![Rule::positive_number(
                    "Estimation price must be a number greater than 0",
                )],
            )
            .field(
                "duration",
                vec![
                    Rule::required("Duration is required"),
                    Rule::positive_number("Duration must be a number greater than 0"),
                ],
            )
            .field(
                "category",
                vec![
                    Rule::required("Please select at least one category."),
                    Rule::one_of(self.categories.iter().cloned(), "Unknown category"),
                ],
            )
    }

    /// Authenticated `POST courses`, expecting 201, then the course list.
    #[must_use]
    pub fn create_course(&self) -> SubmissionController<CourseValues> {
        let operation = Operation::new(
            "create-course",
            Method::POST,
            "courses",
            201,
            AppRoute::InstructorCourses,
        )
        .authenticated()
        .with_body(|values: &CourseValues| to_body(&values.to_request()));

        SubmissionController::new(CourseValues::default(), self.course_schema(), operation)
    }

    /// Authenticated `PUT courses/{id}`, expecting 200, then the course page.
    #[must_use]
    pub fn update_course(
        &self,
        course_id: &str,
        current: CourseValues,
    ) -> SubmissionController<CourseValues> {
        let operation = Operation::new(
            "update-course",
            Method::PUT,
            format!("courses/{course_id}"),
            200,
            AppRoute::InstructorCourse {
                course_id: course_id.to_string(),
            },
        )
        .authenticated()
        .with_body(|values: &CourseValues| to_body(&values.to_request()));

        SubmissionController::new(current, self.course_schema(), operation)
    }
}
