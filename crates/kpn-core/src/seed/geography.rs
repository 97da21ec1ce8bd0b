//! Kebbi State geography: zones, their LGAs and wards

/// `(zone, [(lga, [ward])])` in seeding order
pub(super) const KEBBI_ZONES: &[(&str, &[(&str, &[&str])])] = &[
    (
        "Kebbi North",
        &[
            (
                "Arewa",
                &[
                    "Bui",
                    "Chibike",
                    "Daura",
                    "Gorun Dikko",
                    "Falde",
                    "Feske/Jaffeji",
                    "Gumumdai/Rafin Tsaka",
                    "Kangiwa",
                    "Laima/Jantullu",
                    "Sarka/Dantsoho",
                    "Yeldu",
                ],
            ),
            (
                "Argungu",
                &[
                    "Gotomo",
                    "Dikko",
                    "Felande",
                    "Galadima",
                    "Gulma",
                    "Gwazange",
                    "Kokani North",
                    "Kokani South",
                    "Lailaba",
                    "Sauwa/Kaurar Sani",
                    "Tungar Zazzagawa",
                ],
            ),
            (
                "Augie",
                &[
                    "Augie North",
                    "Augie South",
                    "Bagaye/Mera",
                    "Bayawa North",
                    "Bayawa South",
                    "Birnin Tudu/Gudale",
                    "Bubuce",
                    "Dundaye",
                    "Tiggi",
                    "Yola",
                ],
            ),
            (
                "Bagudo",
                &[
                    "Bagudo",
                    "Bahindi/Boki-Doma",
                    "Bani/Tsamiya/Kali",
                    "Illo/Sabon Gari/Yantau",
                    "Kaoje/Gwamba",
                    "Kende/Kurgu",
                    "Lafagu/Gante",
                    "Lolo/Giris",
                    "Matsinka/Geza",
                    "Sharabi/Kwanguwai",
                    "Zagga/Kwasara",
                ],
            ),
            (
                "Dandi",
                &[
                    "Bani Zumbu",
                    "Buma",
                    "Dolekaina",
                    "Fana",
                    "Maihausawa",
                    "Kyangakwai",
                    "Geza",
                    "Kamba",
                    "Kwakkwaba",
                    "Maigwaza",
                    "Shiko",
                ],
            ),
            (
                "Suru",
                &[
                    "Aljannare",
                    "Bandan",
                    "Barbarejo",
                    "Bakuwa",
                    "Dakingari",
                    "Dandane",
                    "Daniya/Shema",
                    "Ginga",
                    "Giro",
                    "Kwaifa",
                    "Suru",
                ],
            ),
        ],
    ),
    (
        "Kebbi Central",
        &[
            (
                "Aliero",
                &[
                    "Aliero Dangaladima I",
                    "Aliero Dangaladima II",
                    "Aliero S/Fada I",
                    "Aliero S/Fada II",
                    "Danwarai",
                    "Jiga Birni",
                    "Jiga Makera",
                    "Kashin Zama",
                    "Rafin Bauna",
                    "Sabiyal",
                ],
            ),
            (
                "Birnin Kebbi",
                &[
                    "Nassarawa I",
                    "Nassarawa II",
                    "Marafa",
                    "Dangaladima",
                    "Kola/Tarasa",
                    "Makera",
                    "Maurida",
                    "Gwadangaji",
                    "Zauro",
                    "Gawasu",
                    "Kardi/Yamama",
                    "Lagga",
                    "Gulumbe",
                    "Ambursa",
                    "Ujariyo",
                ],
            ),
            (
                "Bunza",
                &[
                    "Bunza Marafa",
                    "Bunza Dangaladima",
                    "Gwade",
                    "Maidahini",
                    "Raha",
                    "Sabon Birni",
                    "Salwai",
                    "Tilli/Hilema",
                    "Tunga",
                    "Zogrima",
                ],
            ),
            (
                "Gwandu",
                &[
                    "Cheberu/Bada",
                    "Dalijan",
                    "Dodoru",
                    "Gulmare",
                    "Gwandu Marafa",
                    "Gwandu Sarkin Fawa",
                    "Kambaza",
                    "Maruda",
                    "Malisa",
                    "Masama Kwasgara",
                ],
            ),
            (
                "Jega",
                &[
                    "Alelu/Gehuru",
                    "Dangamaji",
                    "Dunbegu/Bausara",
                    "Gindi/Nassarawa/Kyarmi/Galbi",
                    "Jandutsi/Birnin Malam",
                    "Jega Firchin",
                    "Jega Kokani",
                    "Jega Magaji B",
                    "Jega Magaji A",
                    "Katanga/Fagada",
                    "Kimba",
                ],
            ),
            (
                "Kalgo",
                &[
                    "Badariya/Magarza",
                    "Dangoma/Gayi",
                    "Diggi",
                    "Etene",
                    "Kalgo",
                    "Kuka",
                    "Mutubari",
                    "Nayilwa",
                    "Wurogauri",
                    "Zuguru",
                ],
            ),
            (
                "Koko/Besse",
                &[
                    "Koko Magaji",
                    "Illela/Sabon Gari",
                    "Koko Firchin",
                    "Dada/Alelu",
                    "Jadadi",
                    "Lani/Manyan/Tafukka/Shiba",
                    "Besse",
                    "Takware",
                    "Dutsin Mari/Dulmeru",
                    "Zariya Kalakala/Amiru",
                    "Madacci/Firini",
                    "Maikwara/Karamar Damra/Bakoshi",
                ],
            ),
            (
                "Maiyama",
                &[
                    "Andarai/Kurunkudu/Zugun Liba",
                    "Giwa Tazo/Zara",
                    "Gumbin Kure",
                    "Karaye/Dogondaji",
                    "Kawara/S/Sara/Yarkamba",
                    "Kuberu/Gidiga",
                    "Liba/Danwa/Kuka Kogo",
                    "Maiyama",
                    "Mungadi/Botoro",
                    "Sambawa/Mayalo",
                    "Sarandosa/Gubba",
                ],
            ),
        ],
    ),
    (
        "Kebbi South",
        &[
            (
                "Wasagu/Danko",
                &[
                    "Ayu",
                    "Bena",
                    "Dan Umaru/Mairairai",
                    "Danko/Maga",
                    "Kanya",
                    "Kyabu/Kandu",
                    "Ribah/Machika",
                    "Waje",
                    "Wasagu",
                    "Yalmo/Shindi",
                    "Gwanfi/Kele",
                ],
            ),
            (
                "Fakai",
                &[
                    "Bajida",
                    "Bangu/Garinisa",
                    "Birnin Tudu",
                    "Mahuta",
                    "Gulbin Kuka/Maijarhula",
                    "Maikende",
                    "Kangi",
                    "Fakai/Zussun",
                    "Marafa",
                    "Penin Amana/Penin Gaba",
                ],
            ),
            (
                "Ngaski",
                &[
                    "Birnin Yauri",
                    "Gafara Machupa",
                    "Garin Baka/Makarin",
                    "Kwakwaran",
                    "Libata/Kwangia",
                    "Kambuwa/Danmaraya",
                    "Makawa Uleira",
                    "Ngaski",
                    "Utono/Hoge",
                    "Wara",
                ],
            ),
            (
                "Sakaba",
                &[
                    "Adai",
                    "Dankolo",
                    "Doka/Bere",
                    "Gelwasa",
                    "Janbirni",
                    "Maza/Maza",
                    "Makuku",
                    "Sakaba",
                    "Tudun Kuka",
                    "Fada",
                ],
            ),
            (
                "Shanga",
                &[
                    "Atuwo",
                    "Binuwa/Gebbe/Bukunji",
                    "Dugu Tsoho/Dugu Raha",
                    "Kawara/Ingu/Sargo",
                    "Rafin Kirya/Tafki Tara",
                    "Sakace/Golongo/Hundeji",
                    "Sawashi",
                    "Shanga",
                    "Takware",
                    "Yarbesse",
                ],
            ),
            (
                "Yauri",
                &[
                    "Chulu/Koma",
                    "Gungun Sarki",
                    "Jijima",
                    "Tondi",
                    "Yelwa Central",
                    "Yelwa East",
                    "Yelwa North",
                    "Yelwa South",
                    "Yelwa West",
                    "Zamare",
                ],
            ),
            (
                "Zuru",
                &[
                    "Bedi",
                    "Ciroman Dabai",
                    "Isgogo/Dago",
                    "Manga/Ushe",
                    "Rafin Zuru",
                    "Rikoto",
                    "Rumu/Daben/Seme",
                    "Senchi",
                    "Taduga",
                    "Zodi",
                ],
            ),
        ],
    ),
];
