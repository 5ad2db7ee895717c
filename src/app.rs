//! Application wiring and the interactive terminal shell.
//!
//! `App` assembles the services (identity client, session manager, profile
//! store, token cache, router) and drives the screen controllers over
//! stdin/stdout. The shell re-runs the session gate before every screen so
//! navigation always reflects the current auth state.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::auth::{HttpIdentityClient, IdentityProvider, SessionManager};
use crate::cache::TokenCache;
use crate::config::Config;
use crate::nav::{MemoryRouter, Route, Router, SessionGate};
use crate::profile::{HttpProfileStore, ProfileStore};
use crate::screens::{HomeScreen, ScreenContext, SignInScreen, SignUpScreen};

pub struct App {
    pub config: Config,
    sessions: Arc<SessionManager>,
    gate: SessionGate,
    router: Arc<MemoryRouter>,
    ctx: ScreenContext,
    sign_in: SignInScreen,
    sign_up: SignUpScreen,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let cache_dir = Config::cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        let token_cache = TokenCache::platform_default(cache_dir);

        let provider: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityClient::new(
            &config.identity_url,
            &config.publishable_key,
        )?);
        let profiles: Arc<dyn ProfileStore> = Arc::new(HttpProfileStore::new(&config.profile_url)?);

        let sessions = Arc::new(SessionManager::new(provider.clone(), token_cache));
        let router = Arc::new(MemoryRouter::new(Route::Home));
        let gate = SessionGate::new(router.clone());

        let ctx = ScreenContext {
            provider,
            sessions: sessions.clone(),
            profiles,
            router: router.clone(),
        };

        let sign_in = SignInScreen::with_email(config.settings.last_email.clone().unwrap_or_default());

        Ok(Self {
            config,
            sessions,
            gate,
            router,
            ctx,
            sign_in,
            sign_up: SignUpScreen::new(),
        })
    }

    /// Drive the screens until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        self.sessions.initialize().await;

        loop {
            let snapshot = self.sessions.snapshot();
            self.gate.evaluate(&snapshot);

            let location = self.router.current();
            let keep_going = if location.is_route(Route::SignIn) {
                self.run_sign_in().await?
            } else if location.is_route(Route::SignUp) {
                self.run_sign_up().await?
            } else {
                self.run_home().await?
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    // =========================================================================
    // Screens
    // =========================================================================

    async fn run_sign_in(&mut self) -> Result<bool> {
        println!("\n=== Platewise Sign In ===");
        println!("(enter your email, or 'g' for Google, 'n' to create an account, 'q' to quit)\n");

        if let Some(message) = self.sign_in.error.take() {
            println!("! {}\n", message);
        }

        let email = Self::prompt_with_default("Email", &self.sign_in.email)?;
        match email.as_str() {
            "q" => return Ok(false),
            "g" => {
                println!("\nWaiting for the browser...");
                self.sign_in.continue_with_google(&self.ctx).await;
                return Ok(true);
            }
            "n" => {
                self.router.replace(Route::SignUp);
                return Ok(true);
            }
            _ => {}
        }

        self.sign_in.email = email;
        self.sign_in.password = rpassword::prompt_password("Password: ")?;

        println!("\nSigning in...");
        self.sign_in.submit(&self.ctx).await;

        if self.sessions.snapshot().is_signed_in {
            self.remember_email(self.sign_in.email.clone());
        }
        Ok(true)
    }

    async fn run_sign_up(&mut self) -> Result<bool> {
        println!("\n=== Platewise Create Account ===");
        println!("('b' to go back to sign in, 'q' to quit)\n");

        if let Some(message) = self.sign_up.error.take() {
            println!("! {}\n", message);
        }

        if self.sign_up.pending_verification {
            let code = Self::prompt("Verification code")?;
            match code.as_str() {
                "q" => return Ok(false),
                "b" => {
                    self.sign_up = SignUpScreen::new();
                    self.router.replace(Route::SignIn);
                    return Ok(true);
                }
                _ => {}
            }

            self.sign_up.code = code;
            println!("\nVerifying...");
            self.sign_up.verify(&self.ctx).await;

            if self.sessions.snapshot().is_signed_in {
                self.remember_email(self.sign_up.email.clone());
                self.sign_up = SignUpScreen::new();
            }
            return Ok(true);
        }

        let first_name = Self::prompt("First name")?;
        match first_name.as_str() {
            "q" => return Ok(false),
            "b" => {
                self.router.replace(Route::SignIn);
                return Ok(true);
            }
            _ => {}
        }

        self.sign_up.first_name = first_name;
        self.sign_up.last_name = Self::prompt("Last name")?;
        self.sign_up.email = Self::prompt("Email")?;
        self.sign_up.password = rpassword::prompt_password("Password: ")?;

        println!("\nCreating account...");
        self.sign_up.submit(&self.ctx).await;

        if self.sign_up.pending_verification {
            println!("We emailed a verification code to {}.", self.sign_up.email);
        }
        Ok(true)
    }

    async fn run_home(&mut self) -> Result<bool> {
        let snapshot = self.sessions.snapshot();
        if let Some(user) = &snapshot.user {
            HomeScreen::on_user_available(&self.ctx, user).await;
        }

        println!("\n=== Platewise ===\n");
        println!("{}", HomeScreen::greeting(snapshot.user.as_ref()));
        println!("Your AI calorie tracker. Start tracking your meals and stay healthy!\n");

        let choice = Self::prompt("'o' to sign out, 'q' to quit")?;
        match choice.as_str() {
            "o" => {
                HomeScreen::sign_out(&self.ctx).await;
                Ok(true)
            }
            "q" => Ok(false),
            _ => Ok(true),
        }
    }

    // =========================================================================
    // Prompt helpers
    // =========================================================================

    fn prompt(label: &str) -> Result<String> {
        print!("{}: ", label);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    fn prompt_with_default(label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            return Self::prompt(label);
        }

        print!("{} [{}]: ", label, default);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input.to_string())
        }
    }

    fn remember_email(&mut self, email: String) {
        self.config.settings.last_email = Some(email);
        if let Err(e) = self.config.settings.save() {
            warn!(error = %e, "Failed to save settings");
        }
    }
}
