//! Session commands: login and logout.

use super::{CliError, build_app};

/// Login and persist the session.
#[allow(clippy::print_stdout)]
pub async fn login(email: &str, password: &str, remember: bool) -> Result<(), CliError> {
    let app = build_app()?;

    let response = app.auth().login(email, password).await?;
    app.session()
        .login(response.token, response.refresh_token, response.user)
        .await;

    if remember {
        app.session().remember_email(email).await;
    }

    let user = app
        .session()
        .current_user()
        .await
        .ok_or_else(|| CliError::Other("session not established".to_owned()))?;
    println!("Logged in as {} <{}>", user.name, user.email);

    Ok(())
}

/// End the session. The remote call is best-effort; local state is
/// cleared regardless.
#[allow(clippy::print_stdout)]
pub async fn logout() -> Result<(), CliError> {
    let app = build_app()?;

    app.session().restore().await;
    app.session().logout(app.auth()).await;
    println!("Logged out");

    Ok(())
}
