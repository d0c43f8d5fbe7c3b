use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "PASSNEST_PASSWORD";

/// Reads the password to check against a stored hash.
pub fn read_password() -> Result<Zeroizing<String>> {
    //  PASSNEST_PASSWORD="hunter2" passnest verify '$2a$08$...'
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    //  printf "%s" "hunter2" | passnest verify '$2a$08$...'
    if !io::stdin().is_terminal() {
        return read_piped_line();
    }

    let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    if pw.is_empty() {
        bail!("No password provided");
    }
    Ok(pw)
}

/// Reads a password to hash, asking twice on a terminal.
pub fn read_new_password_with_confirmation() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    if !io::stdin().is_terminal() {
        return read_piped_line();
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("New password: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);

    if pw1.is_empty() {
        bail!("password cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

fn password_from_env() -> Option<Zeroizing<String>> {
    let pw = Zeroizing::new(std::env::var(PASSWORD_ENV).ok()?);
    if pw.is_empty() { None } else { Some(pw) }
}

fn read_piped_line() -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut buf)?;
    trim_newline(&mut buf);

    if buf.is_empty() {
        bail!("No password provided");
    }
    Ok(buf)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
