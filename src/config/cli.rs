use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "qa-external-users")]
#[command(about = "Inspect the external user integration against a live identity provider")]
pub struct CliConfig {
    #[arg(long, default_value = "qa-external.toml")]
    pub config: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 以 session token 查詢目前登入的使用者
    Whoami {
        #[arg(long)]
        token: String,
        #[arg(long, default_value = "localhost")]
        host: String,
        #[arg(long)]
        https: bool,
    },
    /// 查詢使用者的 email
    Email { userid: String },
    /// 產生使用者的頭像 HTML
    Avatar {
        userid: String,
        #[arg(long, default_value = "32")]
        size: u32,
    },
    /// 產生登入、註冊、登出連結
    Links {
        #[arg(long, default_value = "localhost")]
        host: String,
        #[arg(long)]
        https: bool,
        #[arg(long, default_value = "")]
        redirect: String,
    },
    /// 產生使用者名稱的 HTML
    UsersHtml {
        #[arg(required = true)]
        userids: Vec<String>,
        #[arg(long)]
        link: bool,
        #[arg(long, default_value = "./")]
        prefix: String,
    },
    /// 印出 user id 欄位的 SQL 型別
    ColumnType,
}
