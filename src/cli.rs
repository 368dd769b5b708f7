use basmi_common::MeasurementType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "basmi")]
#[command(about = "BASMI mobility assessment capture client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// エラー以外のログを抑制
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// 結果ファイル（設定より優先）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 撮影して測定値を取得・保存
    Measure {
        /// 測定種別 (0-12)。省略時はメニューから選択
        value: Option<MeasurementType>,

        /// 撮影画像（順番に使用）。省略時は対話入力
        photos: Vec<PathBuf>,

        /// 画像フォルダ（ファイル名順に使用）
        #[arg(short, long, conflicts_with = "photos")]
        folder: Option<PathBuf>,

        /// 2枚撮影の種別で、送信後に撮り直すか確認する
        #[arg(short, long)]
        repeat: bool,
    },

    /// 保存済みの結果を表示
    Results,

    /// 測定手順を表示
    Instructions,

    /// 設定を表示/編集
    Config {
        /// 解析サービスのURLを設定
        #[arg(long)]
        set_service_url: Option<String>,

        /// タイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
