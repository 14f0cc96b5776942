use clap::Parser;
use qa_external_users::utils::{logger, validation::Validate};
use qa_external_users::{
    CliConfig, Command, ExternalUsers, ExternalUsersConfig, OmegaUpUsers, RequestContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match ExternalUsersConfig::from_file(&cli.config).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(if e.is_config_error() { 1 } else { 3 });
        }
    };

    let users = OmegaUpUsers::from_config(config)?;

    match cli.command {
        Command::Whoami { token, host, https } => {
            let ctx = RequestContext::new(host, https)
                .with_cookie(users.config().session.cookie_name.clone(), token);
            match users.logged_in_user(&ctx).await {
                Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
                None => {
                    println!("No valid session");
                    std::process::exit(2);
                }
            }
        }
        Command::Email { userid } => match users.user_email(&userid).await {
            Some(email) => println!("{}", email),
            None => {
                println!("Email unknown for {}", userid);
                std::process::exit(2);
            }
        },
        Command::Avatar { userid, size } => {
            match users.avatar_html_from_userid(&userid, size, false).await {
                Some(html) => println!("{}", html),
                None => {
                    println!("No avatar for {}", userid);
                    std::process::exit(2);
                }
            }
        }
        Command::Links {
            host,
            https,
            redirect,
        } => {
            let ctx = RequestContext::new(host, https);
            let links = users.login_links(&ctx, "./", &redirect);
            println!("{}", serde_json::to_string_pretty(&links)?);
        }
        Command::UsersHtml {
            userids,
            link,
            prefix,
        } => {
            let html = users.users_html(&userids, link, &prefix);
            for userid in &userids {
                if let Some(user_html) = html.get(userid) {
                    println!("{}\t{}", userid, user_html);
                }
            }
        }
        Command::ColumnType => println!("{}", users.user_column_type()),
    }

    Ok(())
}
