//! Phrase banks the generator assembles actions from.

/// Phrases keyed by a facet value.
pub type Keyed = &'static [(&'static str, &'static [&'static str])];

/// Phrases for `value`, or nothing when the bank has no entry for it.
pub fn lookup(bank: Keyed, value: &str) -> &'static [&'static str] {
    bank.iter()
        .find(|(key, _)| *key == value)
        .map(|(_, phrases)| *phrases)
        .unwrap_or(&[])
}

/// How the five candidate steps are laid out for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepLayout {
    /// `hook。constraint`, time, game, budget, ending
    HookThenTime,
    /// `hook。constraint`, `time（verb）`, game, budget, ending
    HookThenAnnotatedTime,
    /// `hook+time`, constraint, game, budget, ending
    HookJoinedWithTime,
}

/// Everything goal-specific the generator draws from.
#[derive(Debug)]
pub struct TemplateFamily {
    pub goal: &'static str,
    /// Empty when the family's titles take no verb; nothing is drawn then
    pub verbs: &'static [&'static str],
    /// `{verb}` is replaced by the drawn verb
    pub titles: &'static [&'static str],
    pub place_hooks: Keyed,
    pub by_duration: Keyed,
    pub by_budget: Keyed,
    pub layout: StepLayout,
}

/// Generation input: facet domains plus every phrase bank.
#[derive(Debug)]
pub struct PhraseTables {
    pub durations: &'static [&'static str],
    pub goals: &'static [&'static str],
    pub places: &'static [&'static str],
    pub budgets: &'static [&'static str],
    pub constraints: &'static [&'static str],
    pub micro_games: &'static [&'static str],
    pub endings: &'static [&'static str],
    pub families: &'static [TemplateFamily],
}

impl PhraseTables {
    pub fn builtin() -> &'static PhraseTables {
        &BUILTIN
    }

    /// Family for `goal`; unknown goals use the last family.
    pub fn family_for(&self, goal: &str) -> Option<&TemplateFamily> {
        self.families
            .iter()
            .find(|f| f.goal == goal)
            .or_else(|| self.families.last())
    }

    /// Size of the duration × goal × place × budget cross-product.
    pub fn combination_count(&self) -> usize {
        self.durations.len() * self.goals.len() * self.places.len() * self.budgets.len()
    }
}

// ============================================================================
// Built-in Tables
// ============================================================================

static BUILTIN: PhraseTables = PhraseTables {
    durations: &["10", "30", "60", "180"],
    goals: &["recover", "growth", "life", "fun"],
    places: &["home", "campus", "outside", "online"],
    budgets: &["0", "low", "mid", "high"],
    constraints: &[
        "スマホは伏せたまま",
        "音を出さない",
        "完璧禁止（60点で切り上げ）",
        "“1回だけ”縛り",
        "“3回だけ”縛り",
        "タイマーを使わず体感で",
        "椅子から立ってやる",
        "姿勢を一回リセットしてから",
    ],
    micro_games: &[
        "コインで決める（表=続行/裏=終了）",
        "A/B二択を作って直感で選ぶ",
        "“見つけたら勝ち”ルールを付ける",
        "禁止ワードを1つ決める（例:『でも』禁止）",
        "3つ集める（色/形/音/匂いなど）",
        "1分だけ“観察者モード”になる",
    ],
    endings: &[
        "最後に一言だけメモして閉じる",
        "写真1枚で締める",
        "次の一手を1行で決めて終わる",
        "片づけて終了",
        "水を一口飲んで完了",
        "深呼吸して完了",
    ],
    families: &[RECOVER, GROWTH, LIFE, FUN],
};

const RECOVER: TemplateFamily = TemplateFamily {
    goal: "recover",
    verbs: &["ほどく", "戻す", "ゆるめる", "整える", "沈める", "冷やす", "温める"],
    titles: &[
        "感覚を{verb}儀式",
        "脳の温度調整",
        "ノイズキャンセル",
        "回復のスイッチ",
        "疲れの正体を捕まえる",
        "静けさを取り戻す",
    ],
    place_hooks: &[
        ("home", &["照明を変える", "窓を開ける", "布の感触を確かめる", "机の上だけ整える"]),
        ("campus", &["静かな端に移動", "窓際に寄る", "踊り場で止まる", "図書館入口で呼吸"]),
        ("outside", &["空を見る", "風向きを当てる", "人の少ない道へ", "足音を数える"]),
        ("online", &["通知を切る", "音量ゼロ", "タブを3つ閉じる", "画面から距離を取る"]),
    ],
    by_duration: &[
        ("10", &["呼吸を3回だけ数える", "肩を5回回す", "水を一口"]),
        ("30", &["遠近でピント切替", "軽ストレッチ1セット", "目を休める"]),
        ("60", &["15分×2 + 休憩で回復ブロック", "温める/冷やすを選ぶ", "疲れの正体を1行"]),
        ("180", &["回復メニューを3つ選ぶ", "やらないことを先に決める", "外部刺激を減らす設計"]),
    ],
    by_budget: &[
        ("0", &["追加購入禁止で工夫", "あるもので完結"]),
        ("low", &["自販機/飲み物1つだけOK", "小さなお菓子1つだけOK"]),
        ("mid", &["小さなご褒美を設計してOK", "場所課金してもOK"]),
        ("high", &["快適さ最優先でOK", "最高の回復を買ってOK"]),
    ],
    layout: StepLayout::HookThenTime,
};

const GROWTH: TemplateFamily = TemplateFamily {
    goal: "growth",
    verbs: &["研ぐ", "分解する", "写す", "要約する", "検証する", "組む", "試す"],
    titles: &[
        "理解を{verb}ミニ実験",
        "弱点を1つ潰す",
        "説明できるに寄せる",
        "定義を武器にする",
        "問題の型を採集する",
        "一枚まとめ錬金術",
    ],
    place_hooks: &[
        ("home", &["紙とペンで", "机の上だけで", "一枚にまとめる"]),
        ("campus", &["図書館で", "空き教室で", "静かな席で"]),
        ("outside", &["ベンチで", "歩きながら考えて", "カフェの端で"]),
        ("online", &["1タブだけで", "検索は1回だけで", "通知OFFで"]),
    ],
    by_duration: &[
        ("10", &["定義/公式を1つ写経", "1問だけ解いて理由を書く", "1段落だけ読んで要点1行"]),
        ("30", &["例題→類題を1セット", "暗記カードを3枚だけ", "間違いの型を1つ特定"]),
        ("60", &["45分集中+15分復習", "要約→自分の言葉で再説明", "ミニテスト→弱点補強"]),
        ("180", &["テーマ1つを深掘り", "理解→演習→まとめの3ブロック", "弱点リスト作成"]),
    ],
    by_budget: &[
        ("0", &["無料で完結", "既存資料だけで勝つ"]),
        ("low", &["コピー1回だけOK", "付箋/紙の小道具OK"]),
        ("mid", &["参考書/印刷を使ってOK", "場所課金OK"]),
        ("high", &["最短で伸びる手段を選んでOK", "良い道具で勝ってOK"]),
    ],
    layout: StepLayout::HookThenAnnotatedTime,
};

const LIFE: TemplateFamily = TemplateFamily {
    goal: "life",
    verbs: &[],
    titles: &[
        "生活の詰まりを抜く",
        "片づけをゲーム化",
        "未来の自分を救助",
        "持ち物の最適化",
        "面倒の根を切る",
        "部屋を再配置する",
    ],
    place_hooks: &[
        ("home", &["床面積を取り戻す", "部屋の地形を変える", "補充で未来を助ける"]),
        ("campus", &["提出/印刷を片付ける", "予定と持ち物を整える", "移動を最適化する"]),
        ("outside", &["用事を2つまでに制限", "寄り道を封印", "必要なものだけ買う"]),
        ("online", &["タブ整理", "ファイル整理", "予定の棚卸し"]),
    ],
    by_duration: &[
        ("10", &["捨てるものを5個見つける", "持ち物を3点だけ整列", "洗面台を1分だけ磨く"]),
        ("30", &["洗濯の1工程だけ進める", "床の一角だけ掃除", "明日の準備を3点だけ"]),
        ("60", &["生活の詰まりを1つ解消", "収納を1エリア点検", "片づけ→掃除→補充を1セット"]),
        ("180", &["生活の負債をまとめて返す", "部屋をゾーンで攻略", "家事を完成まで"]),
    ],
    by_budget: &[
        ("0", &["買わずに工夫", "あるもので回す"]),
        ("low", &["消耗品の補充を1つだけOK", "コピー/自販機1回OK"]),
        ("mid", &["便利で短縮してOK", "未来が楽になる買い物OK"]),
        ("high", &["時間を買ってOK", "快適性最優先でOK"]),
    ],
    layout: StepLayout::HookThenTime,
};

const FUN: TemplateFamily = TemplateFamily {
    goal: "fun",
    verbs: &["集める", "探す", "撮る", "作る", "混ぜる", "遊ぶ", "語る"],
    titles: &[
        "遊びを{verb}実験",
        "観察のコレクション",
        "即席クリエイト",
        "小さな冒険",
        "面白いの採集",
        "ルールを作って遊ぶ",
    ],
    place_hooks: &[
        ("home", &["部屋の中で", "机の上で", "音を小さくして"]),
        ("campus", &["キャンパスで", "掲示板の周りで", "図書館近くで"]),
        ("outside", &["街で", "川/公園で", "人の少ない道で"]),
        ("online", &["オンラインで", "1タブだけで", "通知OFFで"]),
    ],
    by_duration: &[
        ("10", &["写真を1枚だけ“テーマ付き”で撮る", "ランダム単語3つでミニ創作", "1曲で“1動作”作る"]),
        ("30", &["3つ集める散歩（色/形/音）", "短いレビューを1本書く", "ミニ作品を1つ作る"]),
        ("60", &["撮る→選ぶ→整えるまで完了", "ミニ企画（テーマ制）をやる", "趣味を1時間だけ本気"]),
        ("180", &["作品を1つ完成させる", "小旅行レベルで場所を変える", "インプット→アウトプット1セット"]),
    ],
    by_budget: &[
        ("0", &["無料縛りで工夫", "道具は手元のものだけ"]),
        ("low", &["小道具1つOK", "お菓子1つOK"]),
        ("mid", &["素材/場所に少し使ってOK", "カフェ/文具OK"]),
        ("high", &["面白さ最優先でOK", "体験を買ってOK"]),
    ],
    layout: StepLayout::HookJoinedWithTime,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_covers_every_domain_value() {
        let tables = PhraseTables::builtin();
        for family in tables.families {
            for place in tables.places {
                assert!(!lookup(family.place_hooks, place).is_empty(), "{} {}", family.goal, place);
            }
            for duration in tables.durations {
                assert!(!lookup(family.by_duration, duration).is_empty());
            }
            for budget in tables.budgets {
                assert!(!lookup(family.by_budget, budget).is_empty());
            }
        }
    }

    #[test]
    fn test_family_lookup_falls_back_to_last() {
        let tables = PhraseTables::builtin();
        assert_eq!(tables.family_for("growth").map(|f| f.goal), Some("growth"));
        assert_eq!(tables.family_for("unknown").map(|f| f.goal), Some("fun"));
    }

    #[test]
    fn test_combination_count() {
        assert_eq!(PhraseTables::builtin().combination_count(), 256);
    }
}
