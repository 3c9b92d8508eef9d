use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// 基于块哈希树的二进制文件比较工具
#[derive(Parser, Debug)]
#[command(name = "mcmp")]
#[command(about = "基于块哈希树的二进制文件比较工具", long_about = None)]
pub struct Cli {
    /// 列出所有不同的字节 (位置、两个文件中的八进制值)，必须给出
    #[arg(short = 'l')]
    pub list: bool,
    /// 第一个文件
    pub file_a: PathBuf,
    /// 第二个文件
    pub file_b: PathBuf,
    /// TOML 配置文件
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// 提高日志级别 (可重复)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// `-l` 是唯一的输出模式，缺少时按用法错误处理
    pub fn check(self) -> Result<Self, clap::Error> {
        if !self.list {
            return Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "缺少参数 -l\n\n用法: mcmp -l <FILE_A> <FILE_B>",
            ));
        }
        Ok(self)
    }
}
